//! secp256k1 private key.
//!
//! Stores the scalar as 32 big-endian bytes (zeroized on drop) together
//! with its public key, and adds WIF encoding, ECDH and the signing entry
//! points.

use std::fmt;

use num_bigint::BigUint;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::base58;
use crate::curve::arith::to_bytes32;
use crate::curve::Curve;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::ecdsa;
use crate::schnorr::{self, SchnorrSignature};
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Compression flag byte appended to WIF for compressed public keys.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key, a scalar in `[1, N)`.
#[derive(Clone)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_BYTES_LEN],
    pub_key: PublicKey,
}

/// The parts of a decoded WIF string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedWif {
    /// The private key.
    pub key: PrivateKey,
    /// The version byte (0x80 mainnet, 0xef testnet).
    pub prefix: u8,
    /// Whether the key is flagged for a compressed public key.
    pub compressed: bool,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        let curve = Curve::secp256k1();
        loop {
            let d = ecdsa::random_scalar(curve, &mut OsRng);
            if let Ok(key) = Self::from_scalar(&d) {
                return key;
            }
        }
    }

    /// Create a private key from a scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, or `PrimitivesError::InvalidScalar` if `d` is not in `[1, N)`.
    pub fn from_scalar(d: &BigUint) -> Result<Self, PrimitivesError> {
        let pub_key = PublicKey::from_scalar(d)?;
        Ok(PrivateKey {
            bytes: to_bytes32(d),
            pub_key,
        })
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, `PrimitivesError::InvalidKeyLength` for a slice that is
    /// not 32 bytes, or `PrimitivesError::InvalidScalar` for zero or a value
    /// not below N.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        Self::from_scalar(&BigUint::from_bytes_be(bytes))
    }

    /// Create a private key from a 64-character hexadecimal string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidHex(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a WIF (Wallet Import Format) string.
    ///
    /// Accepts any version byte; network interpretation of the prefix is left
    /// to the caller.
    ///
    /// # Returns
    /// `Ok(DecodedWif)`, `PrimitivesError::ChecksumMismatch` for a bad
    /// checksum, or `PrimitivesError::InvalidWif` for a malformed payload.
    pub fn from_wif(wif: &str) -> Result<DecodedWif, PrimitivesError> {
        let (prefix, payload) = base58::check_decode(wif)?;
        let compressed = match payload.len() {
            33 => {
                if payload[32] != COMPRESS_MAGIC {
                    return Err(PrimitivesError::InvalidWif(
                        "malformed private key: invalid compression flag".to_string(),
                    ));
                }
                true
            }
            32 => false,
            other => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "malformed private key: invalid length {}",
                    other
                )));
            }
        };
        let key = Self::from_bytes(&payload[..PRIVATE_KEY_BYTES_LEN])?;
        Ok(DecodedWif {
            key,
            prefix,
            compressed,
        })
    }

    /// Encode the private key as a WIF string.
    ///
    /// # Arguments
    /// * `prefix` - The network prefix byte (0x80 for mainnet, 0xef for testnet).
    /// * `compressed` - Append the 0x01 compressed-public-key flag.
    pub fn to_wif(&self, prefix: u8, compressed: bool) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_BYTES_LEN + 1);
        payload.extend_from_slice(&self.bytes);
        if compressed {
            payload.push(COMPRESS_MAGIC);
        }
        let wif = base58::check_encode(prefix, &payload);
        payload.zeroize();
        wif
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_BYTES_LEN] {
        self.bytes
    }

    /// Serialize the private key as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// The private scalar.
    pub fn scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }

    /// The corresponding public key.
    pub fn pub_key(&self) -> PublicKey {
        self.pub_key.clone()
    }

    /// Sign a message hash using deterministic RFC 6979 nonces.
    ///
    /// Produces a low-S normalized signature per BIP-0062.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        ecdsa::sign_deterministic(Curve::secp256k1(), &self.scalar(), hash)
    }

    /// Sign a message hash with a fresh random nonce.
    pub fn sign_random(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        let curve = Curve::secp256k1();
        ecdsa::sign(curve, &self.scalar(), &ecdsa::message_scalar(curve, hash))
    }

    /// Produce an experimental Schnorr signature over a message hash.
    pub fn sign_schnorr(&self, hash: &[u8]) -> Result<SchnorrSignature, PrimitivesError> {
        let curve = Curve::secp256k1();
        schnorr::sign(curve, &self.scalar(), &ecdsa::message_scalar(curve, hash))
    }

    /// Compute an ECDH shared point `d·Q` with another party's public key.
    ///
    /// # Returns
    /// The shared point as a `PublicKey`; use [`PrivateKey::shared_x`] for the
    /// bare x coordinate.
    pub fn derive_shared_secret(&self, pub_key: &PublicKey) -> Result<PublicKey, PrimitivesError> {
        let curve = Curve::secp256k1();
        let shared = curve.multiply(&self.scalar(), &pub_key.to_curve_point())?;
        PublicKey::from_point(&shared)
    }

    /// The 32-byte x coordinate of the ECDH shared point.
    pub fn shared_x(&self, pub_key: &PublicKey) -> Result<[u8; 32], PrimitivesError> {
        Ok(self.derive_shared_secret(pub_key)?.point().x_bytes())
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key.to_hex())
            .finish_non_exhaustive()
    }
}
