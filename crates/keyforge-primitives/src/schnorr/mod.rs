//! Experimental Schnorr signatures over an arbitrary [`Curve`].
//!
//! Not BIP-340. The challenge is `e = SHA-256(r ‖ Q.x ‖ m) mod N` with
//! `r = R.x mod N` and every field written as 32 big-endian bytes. The
//! signature carries the nonce point R itself (compressed) alongside `s`,
//! so it verifies as `s·G == R + e·Q`.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::curve::arith::{add_mod, mul_mod, to_bytes32};
use crate::curve::{AffinePoint, Curve, CurvePoint, COMPRESSED_LEN};
use crate::ecdsa::random_scalar;
use crate::hash::sha256;
use crate::PrimitivesError;

/// Serialized length: compressed R followed by 32-byte s.
pub const SCHNORR_SIGNATURE_LEN: usize = COMPRESSED_LEN + 32;

/// A Schnorr signature `(R, s)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchnorrSignature {
    r_point: AffinePoint,
    s: BigUint,
}

impl SchnorrSignature {
    /// The nonce point R.
    pub fn r_point(&self) -> &AffinePoint {
        &self.r_point
    }

    /// The response scalar s.
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Serialize as `compressed(R) ‖ s` (65 bytes).
    pub fn to_bytes(&self) -> [u8; SCHNORR_SIGNATURE_LEN] {
        let mut out = [0u8; SCHNORR_SIGNATURE_LEN];
        out[..COMPRESSED_LEN].copy_from_slice(&self.r_point.to_compressed());
        out[COMPRESSED_LEN..].copy_from_slice(&to_bytes32(&self.s));
        out
    }

    /// Parse `compressed(R) ‖ s` on the given curve.
    ///
    /// # Returns
    /// `Ok(SchnorrSignature)`, `PrimitivesError::InvalidSignatureFormat` for a
    /// wrong length or out-of-range s, or the decompression error for R.
    pub fn from_bytes(curve: &Curve, bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SCHNORR_SIGNATURE_LEN {
            return Err(PrimitivesError::InvalidSignatureFormat(format!(
                "expected {} bytes, got {}",
                SCHNORR_SIGNATURE_LEN,
                bytes.len()
            )));
        }
        let r_point = curve
            .decompress(&bytes[..COMPRESSED_LEN])?
            .to_affine()?
            .clone();
        let s = BigUint::from_bytes_be(&bytes[COMPRESSED_LEN..]);
        if s.is_zero() || &s >= curve.n() {
            return Err(PrimitivesError::InvalidSignatureFormat(
                "schnorr s is outside [1, N)".to_string(),
            ));
        }
        Ok(SchnorrSignature { r_point, s })
    }
}

/// Sign a message scalar with a nonce from the OS RNG.
pub fn sign(curve: &Curve, d: &BigUint, m: &BigUint) -> Result<SchnorrSignature, PrimitivesError> {
    sign_with_rng(curve, d, m, &mut OsRng)
}

/// Sign a message scalar, drawing the nonce from `rng`.
///
/// # Arguments
/// * `curve` - Domain parameters.
/// * `d` - Private scalar in `[1, N)`.
/// * `m` - Message scalar; only its low 256 bits enter the challenge.
///
/// # Returns
/// A `SchnorrSignature`, or `PrimitivesError::InvalidScalar` if `d` is out of range.
pub fn sign_with_rng<R: RngCore + CryptoRng>(
    curve: &Curve,
    d: &BigUint,
    m: &BigUint,
    rng: &mut R,
) -> Result<SchnorrSignature, PrimitivesError> {
    curve.check_scalar(d)?;
    let n = curve.n();
    let q = curve.multiply_base(d)?;
    let q_x = q.to_affine()?.x().clone();

    loop {
        let z = random_scalar(curve, rng);
        let r_point = curve.multiply_base(&z)?.to_affine()?.clone();
        let e = challenge(curve, r_point.x(), &q_x, m);
        let s = add_mod(&z, &mul_mod(&e, d, n), n);
        if s.is_zero() {
            tracing::debug!("schnorr nonce produced s = 0, retrying");
            continue;
        }
        return Ok(SchnorrSignature { r_point, s });
    }
}

/// Verify a Schnorr signature: `s·G == R + e·Q`.
///
/// # Returns
/// `Ok(true)` for a valid signature, `Ok(false)` for a mismatch, and
/// `PrimitivesError::InvalidPublicKey` for an identity or off-curve `q`.
pub fn verify(
    curve: &Curve,
    q: &CurvePoint,
    m: &BigUint,
    sig: &SchnorrSignature,
) -> Result<bool, PrimitivesError> {
    if q.is_infinity() || !curve.is_on_curve(q) {
        return Err(PrimitivesError::InvalidPublicKey(
            "public key is not a curve point".to_string(),
        ));
    }
    let r_point = CurvePoint::Affine(sig.r_point.clone());
    if !curve.is_on_curve(&r_point) || sig.s.is_zero() || &sig.s >= curve.n() {
        return Ok(false);
    }

    let q_x = q.to_affine()?.x();
    let e = challenge(curve, sig.r_point.x(), q_x, m);
    let lhs = curve.multiply_base(&sig.s)?;
    let rhs = curve.add(&r_point, &curve.multiply(&e, q)?)?;
    Ok(lhs == rhs)
}

/// `r` is `R.x mod N`.
fn challenge(curve: &Curve, r_x: &BigUint, q_x: &BigUint, m: &BigUint) -> BigUint {
    let r = r_x % curve.n();
    let mut buf = Vec::with_capacity(96);
    buf.extend_from_slice(&to_bytes32(&r));
    buf.extend_from_slice(&to_bytes32(q_x));
    buf.extend_from_slice(&to_bytes32(m));
    BigUint::from_bytes_be(&sha256(&buf)) % curve.n()
}
