//! ECDSA signature value with strict DER serialization.
//!
//! Supports DER encoding/decoding, low-S normalization and verification
//! against a [`PublicKey`]. The signing algorithms live in
//! [`crate::ecdsa`]; this type only carries and encodes `(r, s)`.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::curve::arith::to_bytes32;
use crate::curve::Curve;
use crate::ec::public_key::PublicKey;
use crate::ecdsa;
use crate::PrimitivesError;

/// ASN.1 SEQUENCE tag.
const DER_SEQUENCE: u8 = 0x30;

/// ASN.1 INTEGER tag.
const DER_INTEGER: u8 = 0x02;

/// An ECDSA signature with R and S components, both in `[1, N)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    /// Create a signature from R and S, checking both against the secp256k1
    /// group order.
    ///
    /// # Returns
    /// `Ok(Signature)`, or `PrimitivesError::InvalidSignatureFormat` if either
    /// component is zero or not below N.
    pub fn new(r: BigUint, s: BigUint) -> Result<Self, PrimitivesError> {
        let n = Curve::secp256k1().n();
        check_component(&r, n, "R")?;
        check_component(&s, n, "S")?;
        Ok(Signature { r, s })
    }

    /// Build a signature without range checks. Used by the signer, whose
    /// outputs are in range by construction, and by curve-generic code.
    pub(crate) fn new_unchecked(r: BigUint, s: BigUint) -> Self {
        Signature { r, s }
    }

    /// The R component.
    pub fn r(&self) -> &BigUint {
        &self.r
    }

    /// The S component.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// R as 32 big-endian bytes.
    pub fn r_bytes(&self) -> [u8; 32] {
        to_bytes32(&self.r)
    }

    /// S as 32 big-endian bytes.
    pub fn s_bytes(&self) -> [u8; 32] {
        to_bytes32(&self.s)
    }

    /// Whether S lies in the lower half of the group order (BIP-0062).
    pub fn is_low_s(&self) -> bool {
        &self.s <= Curve::secp256k1().half_n()
    }

    /// Return the equivalent signature with S replaced by `N - S` when S is
    /// in the upper half of the order.
    pub fn normalize_s(&self) -> Signature {
        let curve = Curve::secp256k1();
        if self.is_low_s() {
            self.clone()
        } else {
            Signature {
                r: self.r.clone(),
                s: curve.n() - &self.s,
            }
        }
    }

    /// Parse a strict DER-encoded ECDSA signature.
    ///
    /// Expected format: 0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>, with
    /// short-form lengths, minimally encoded non-negative integers and no
    /// trailing bytes.
    ///
    /// # Arguments
    /// * `bytes` - DER-encoded signature bytes.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, `PrimitivesError::MalformedDer` if the
    /// structure is wrong, or `PrimitivesError::InvalidSignatureFormat` if the
    /// structure is fine but R or S is out of range.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < 2 {
            return Err(malformed("too short"));
        }
        if bytes[0] != DER_SEQUENCE {
            return Err(malformed("no header magic"));
        }
        let seq_len = bytes[1] as usize;
        if seq_len & 0x80 != 0 {
            return Err(malformed("long-form sequence length"));
        }
        if seq_len != bytes.len() - 2 {
            return Err(PrimitivesError::MalformedDer(format!(
                "sequence length {} does not match {} remaining bytes",
                seq_len,
                bytes.len() - 2
            )));
        }

        let body = &bytes[2..];
        let mut idx = 0;
        let r = read_integer(body, &mut idx, "R")?;
        let s = read_integer(body, &mut idx, "S")?;
        if idx != body.len() {
            return Err(malformed("trailing bytes after S"));
        }

        Signature::new(r, s)
    }

    /// Serialize the signature in DER format.
    ///
    /// Integers are minimally encoded, with a 0x00 pad when the high bit is
    /// set. S is written as stored; call [`Signature::normalize_s`] first for
    /// a low-S encoding.
    pub fn to_der(&self) -> Vec<u8> {
        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&self.s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(DER_SEQUENCE);
        out.push((total_len - 2) as u8);
        out.push(DER_INTEGER);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(DER_INTEGER);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Verify this signature against a message hash and public key.
    ///
    /// # Returns
    /// `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        let curve = Curve::secp256k1();
        let m = ecdsa::message_scalar(curve, hash);
        ecdsa::verify(curve, &pub_key.to_curve_point(), &m, self).unwrap_or(false)
    }
}

fn check_component(v: &BigUint, n: &BigUint, name: &str) -> Result<(), PrimitivesError> {
    if v.is_zero() {
        return Err(PrimitivesError::InvalidSignatureFormat(format!(
            "signature {} is zero",
            name
        )));
    }
    if v >= n {
        return Err(PrimitivesError::InvalidSignatureFormat(format!(
            "signature {} is >= curve.N",
            name
        )));
    }
    Ok(())
}

fn malformed(msg: &str) -> PrimitivesError {
    PrimitivesError::MalformedDer(msg.to_string())
}

/// Read one DER INTEGER starting at `body[*idx]`, advancing `idx` past it.
fn read_integer(body: &[u8], idx: &mut usize, name: &str) -> Result<BigUint, PrimitivesError> {
    if *idx + 2 > body.len() {
        return Err(PrimitivesError::MalformedDer(format!(
            "truncated {} header",
            name
        )));
    }
    if body[*idx] != DER_INTEGER {
        return Err(PrimitivesError::MalformedDer(format!(
            "no int marker for {}",
            name
        )));
    }
    let len = body[*idx + 1] as usize;
    *idx += 2;

    if len == 0 {
        return Err(PrimitivesError::MalformedDer(format!("{} has zero length", name)));
    }
    if len & 0x80 != 0 {
        return Err(PrimitivesError::MalformedDer(format!(
            "long-form length for {}",
            name
        )));
    }
    if len > body.len() - *idx {
        return Err(PrimitivesError::MalformedDer(format!(
            "bogus {} length {}",
            name, len
        )));
    }

    let int = &body[*idx..*idx + len];
    *idx += len;

    if int[0] & 0x80 != 0 {
        return Err(PrimitivesError::MalformedDer(format!("{} is negative", name)));
    }
    if len > 1 && int[0] == 0x00 && int[1] & 0x80 == 0 {
        return Err(PrimitivesError::MalformedDer(format!(
            "{} has excess padding",
            name
        )));
    }
    Ok(BigUint::from_bytes_be(int))
}

/// Canonicalize an integer for DER encoding.
///
/// Uses the minimal big-endian representation and adds a 0x00 byte if the
/// high bit is set, so the value is not read back as negative.
fn canonicalize_int(val: &BigUint) -> Vec<u8> {
    let trimmed = val.to_bytes_be();
    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(&trimmed);
        out
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::private_key::PrivateKey;
    use crate::hash::sha256;

    fn from_hex(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    fn valid_sig() -> Vec<u8> {
        vec![
            0x30, 0x44, 0x02, 0x20, 0x4e, 0x45, 0xe1, 0x69, 0x32, 0xb8, 0xaf, 0x51, 0x49, 0x61,
            0xa1, 0xd3, 0xa1, 0xa2, 0x5f, 0xdf, 0x3f, 0x4f, 0x77, 0x32, 0xe9, 0xd6, 0x24, 0xc6,
            0xc6, 0x15, 0x48, 0xab, 0x5f, 0xb8, 0xcd, 0x41, 0x02, 0x20, 0x18, 0x15, 0x22, 0xec,
            0x8e, 0xca, 0x07, 0xde, 0x48, 0x60, 0xa4, 0xac, 0xdd, 0x12, 0x90, 0x9d, 0x83, 0x1c,
            0xc5, 0x6c, 0xbb, 0xac, 0x46, 0x22, 0x08, 0x22, 0x21, 0xa8, 0x76, 0x8d, 0x1d, 0x09,
        ]
    }

    #[test]
    fn test_signatures_der_parsing() {
        let valid = valid_sig();
        let sig = Signature::from_der(&valid).unwrap();
        assert_eq!(
            hex::encode(sig.r_bytes()),
            "4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"
        );
        assert_eq!(sig.to_der(), valid);

        assert!(matches!(
            Signature::from_der(&[]),
            Err(PrimitivesError::MalformedDer(_))
        ));

        let mut bad_magic = valid.clone();
        bad_magic[0] = 0x31;
        assert!(matches!(
            Signature::from_der(&bad_magic),
            Err(PrimitivesError::MalformedDer(_))
        ));

        let mut bad_marker = valid.clone();
        bad_marker[2] = 0x03;
        assert!(matches!(
            Signature::from_der(&bad_marker),
            Err(PrimitivesError::MalformedDer(_))
        ));

        let mut bad_len = valid.clone();
        bad_len[1] = 0x45;
        assert!(matches!(
            Signature::from_der(&bad_len),
            Err(PrimitivesError::MalformedDer(_))
        ));

        let mut trailing = valid.clone();
        trailing[1] = 0x45;
        trailing.push(0x00);
        assert!(matches!(
            Signature::from_der(&trailing),
            Err(PrimitivesError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_der_rejects_non_minimal_integers() {
        // R = 0x00 0x01 carries a redundant pad byte.
        let padded = [0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01];
        assert!(matches!(
            Signature::from_der(&padded),
            Err(PrimitivesError::MalformedDer(_))
        ));

        // R = 0x81 would be negative.
        let negative = [0x30, 0x06, 0x02, 0x01, 0x81, 0x02, 0x01, 0x01];
        assert!(matches!(
            Signature::from_der(&negative),
            Err(PrimitivesError::MalformedDer(_))
        ));
    }

    #[test]
    fn test_der_rejects_out_of_range_values() {
        let zero_r = [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x01];
        assert!(matches!(
            Signature::from_der(&zero_r),
            Err(PrimitivesError::InvalidSignatureFormat(_))
        ));

        let n = Curve::secp256k1().n().clone();
        let sig = Signature::new_unchecked(BigUint::from(1u8), n);
        assert!(matches!(
            Signature::from_der(&sig.to_der()),
            Err(PrimitivesError::InvalidSignatureFormat(_))
        ));
    }

    #[test]
    fn test_signature_serialize() {
        // r and s most significant bits are zero
        let sig = Signature::new(
            from_hex("4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"),
            from_hex("181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09"),
        )
        .unwrap();
        let expected = hex::decode(
            "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
             0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09",
        )
        .unwrap();
        assert_eq!(sig.to_der(), expected, "valid 1");

        // s is bigger than half order
        let sig = Signature::new(
            from_hex("a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404"),
            from_hex("971729c7fa944b465b35250c6570a2f31acbb14b13d1565fab7330dcb2b3dfb1"),
        )
        .unwrap();
        assert!(!sig.is_low_s());
        let normalized = sig.normalize_s();
        assert!(normalized.is_low_s());
        let expected = hex::decode(
            "3045022100a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404\
             022068e8d638056bb4b9a4cadaf39a8f5d0b9fe32b9b9b7749dc145f2db01d826190",
        )
        .unwrap();
        assert_eq!(normalized.to_der(), expected, "low-S normalization");

        // High S survives a DER round trip untouched.
        assert_eq!(Signature::from_der(&sig.to_der()).unwrap(), sig);

        let sig = Signature::new_unchecked(BigUint::zero(), BigUint::zero());
        let expected: Vec<u8> = vec![0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00];
        assert_eq!(sig.to_der(), expected, "zero signature");
    }

    #[test]
    fn test_new_rejects_zero_and_order() {
        let n = Curve::secp256k1().n().clone();
        assert!(Signature::new(BigUint::zero(), BigUint::from(1u8)).is_err());
        assert!(Signature::new(BigUint::from(1u8), BigUint::zero()).is_err());
        assert!(Signature::new(n.clone(), BigUint::from(1u8)).is_err());
        assert!(Signature::new(BigUint::from(1u8), &n - 1u8).is_ok());
    }

    /// Trezor/CoreBitcoin deterministic signing vectors.
    #[test]
    fn test_rfc6979() {
        let tests = vec![
            (
                "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
                "sample",
                "3045022100af340daf02cc15c8d5d08d7735dfe6b98a474ed373bdb5fbecf7571be52b384202205009fb27f37034a9b24b707b7c6b79ca23ddef9e25f7282e8a797efe53a8f124",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000001",
                "Satoshi Nakamoto",
                "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d802202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
            ),
            (
                "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
                "Satoshi Nakamoto",
                "3045022100fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d002206b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5",
            ),
            (
                "f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181",
                "Alan Turing",
                "304402207063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c022058dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000001",
                "All those moments will be lost in time, like tears in rain. Time to die...",
                "30450221008600dbd41e348fe5c9465ab92d23e3db8b98b873beecd930736488696438cb6b0220547fe64427496db33bf66019dacbf0039c04199abb0122918601db38a72cfc21",
            ),
            (
                "e91671c46231f833a6406ccbea0e3e392c76c167bac1cb013f6f1013980455c2",
                "There is a computer disease that anybody who works with computers knows about. It's a very serious disease and it interferes completely with the work. The trouble with computers is that you 'play' with them!",
                "3045022100b552edd27580141f3b2a5463048cb7cd3e047b97c9f98076c32dbdf85a68718b0220279fa72dd19bfae05577e06c7c0c1900c371fcd5893f7e1d56a37d30174671f6",
            ),
        ];

        for (key_hex, msg, expected_sig_hex) in &tests {
            let priv_key = PrivateKey::from_hex(key_hex).unwrap();
            let hash = sha256(msg.as_bytes());

            let sig = priv_key.sign(&hash).unwrap();
            assert_eq!(
                hex::encode(sig.to_der()),
                *expected_sig_hex,
                "RFC6979 test for message '{}'",
                msg
            );
            assert!(priv_key.pub_key().verify(&hash, &sig));
        }
    }

    #[test]
    fn test_verify_rejects_wrong_hash() {
        let priv_key = PrivateKey::from_hex(
            "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
        )
        .unwrap();
        let sig = priv_key.sign(&sha256(b"sample")).unwrap();
        assert!(!sig.verify(&sha256(b"samplf"), &priv_key.pub_key()));
    }
}
