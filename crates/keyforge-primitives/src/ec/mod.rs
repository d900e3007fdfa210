//! Key codec and signature types on secp256k1.
//!
//! Provides private keys, public keys and ECDSA signatures, plus the
//! point-level helpers for deriving and hex-encoding public keys.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::{DecodedWif, PrivateKey};
pub use public_key::PublicKey;
pub use signature::Signature;

use num_bigint::BigUint;

use crate::curve::{Curve, CurvePoint};
use crate::PrimitivesError;

/// Compute the public point `d·G` on secp256k1.
///
/// # Returns
/// The point, or `PrimitivesError::InvalidScalar` if `d` is not in `[1, N)`.
pub fn public_key_of(d: &BigUint) -> Result<CurvePoint, PrimitivesError> {
    let curve = Curve::secp256k1();
    curve.check_scalar(d)?;
    curve.multiply_base(d)
}

/// `04 ‖ x ‖ y` as lowercase hex, each coordinate padded to 32 bytes.
pub fn to_uncompressed_hex(point: &CurvePoint) -> Result<String, PrimitivesError> {
    Ok(hex::encode(point.to_affine()?.to_uncompressed()))
}

/// `02|03 ‖ x` as lowercase hex.
pub fn to_compressed_hex(point: &CurvePoint) -> Result<String, PrimitivesError> {
    Ok(hex::encode(point.to_affine()?.to_compressed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codec_helpers() {
        let g = public_key_of(&BigUint::from(1u8)).unwrap();
        assert_eq!(
            to_compressed_hex(&g).unwrap(),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(
            to_uncompressed_hex(&g).unwrap(),
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
    }

    #[test]
    fn test_key_codec_rejects_identity_and_zero() {
        assert_eq!(
            to_uncompressed_hex(&CurvePoint::Infinity),
            Err(PrimitivesError::PointAtInfinity)
        );
        assert!(matches!(
            public_key_of(&BigUint::from(0u8)),
            Err(PrimitivesError::InvalidScalar(_))
        ));
    }
}
