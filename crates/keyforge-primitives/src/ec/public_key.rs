//! secp256k1 public key.
//!
//! A [`PublicKey`] is always a finite point on secp256k1; the identity and
//! off-curve coordinates are rejected at construction.

use std::fmt;

use num_bigint::BigUint;

use crate::curve::{AffinePoint, Curve, CurvePoint, COMPRESSED_LEN, UNCOMPRESSED_LEN};
use crate::ec::signature::Signature;
use crate::ecdsa;
use crate::hash::hash160;
use crate::schnorr::{self, SchnorrSignature};
use crate::PrimitivesError;

/// A secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey {
    point: AffinePoint,
}

impl PublicKey {
    /// Derive the public key `d·G` for a private scalar.
    ///
    /// # Returns
    /// `Ok(PublicKey)`, or `PrimitivesError::InvalidScalar` if `d` is not in `[1, N)`.
    pub fn from_scalar(d: &BigUint) -> Result<Self, PrimitivesError> {
        let curve = Curve::secp256k1();
        curve.check_scalar(d)?;
        Self::from_point(&curve.multiply_base(d)?)
    }

    /// Wrap a secp256k1 curve point.
    ///
    /// # Returns
    /// `Ok(PublicKey)`, `PrimitivesError::PointAtInfinity` for the identity, or
    /// `PrimitivesError::InvalidPublicKey` if the point is not on secp256k1.
    pub fn from_point(point: &CurvePoint) -> Result<Self, PrimitivesError> {
        let affine = point.to_affine()?;
        if !Curve::secp256k1().is_on_curve(point) {
            return Err(PrimitivesError::InvalidPublicKey(
                "point is not on secp256k1".to_string(),
            ));
        }
        Ok(PublicKey {
            point: affine.clone(),
        })
    }

    /// Parse a public key from its compressed (33-byte) or uncompressed
    /// (65-byte) SEC1 encoding.
    ///
    /// # Returns
    /// `Ok(PublicKey)`, or `PrimitivesError::InvalidPublicKey` for any other
    /// length, an unknown prefix, or a point off the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let curve = Curve::secp256k1();
        match bytes.len() {
            COMPRESSED_LEN => Self::from_point(&curve.decompress(bytes)?),
            UNCOMPRESSED_LEN => {
                if bytes[0] != 0x04 {
                    return Err(PrimitivesError::InvalidPublicKey(format!(
                        "unknown uncompressed prefix 0x{:02x}",
                        bytes[0]
                    )));
                }
                let x = BigUint::from_bytes_be(&bytes[1..33]);
                let y = BigUint::from_bytes_be(&bytes[33..]);
                Self::from_point(&curve.point(x, y)?)
            }
            other => Err(PrimitivesError::InvalidPublicKey(format!(
                "invalid key length {}",
                other
            ))),
        }
    }

    /// Parse a public key from a hex-encoded SEC1 string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// The affine point.
    pub fn point(&self) -> &AffinePoint {
        &self.point
    }

    /// The key as a [`CurvePoint`] for the engine operations.
    pub fn to_curve_point(&self) -> CurvePoint {
        CurvePoint::Affine(self.point.clone())
    }

    /// Serialize in 33-byte compressed format.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        self.point.to_compressed()
    }

    /// Serialize in 65-byte uncompressed format.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        self.point.to_uncompressed()
    }

    /// Compressed encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Uncompressed encoding as lowercase hex.
    pub fn to_uncompressed_hex(&self) -> String {
        hex::encode(self.to_uncompressed())
    }

    /// Hash160 of the compressed encoding, used by P2PKH and P2WPKH.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Verify an ECDSA signature over a message hash.
    ///
    /// # Returns
    /// `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    /// Verify a Schnorr signature over a message hash.
    pub fn verify_schnorr(&self, hash: &[u8], sig: &SchnorrSignature) -> bool {
        let curve = Curve::secp256k1();
        let m = ecdsa::message_scalar(curve, hash);
        schnorr::verify(curve, &self.to_curve_point(), &m, sig).unwrap_or(false)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
