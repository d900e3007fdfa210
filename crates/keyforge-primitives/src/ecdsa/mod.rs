//! ECDSA signing and verification over an arbitrary [`Curve`].
//!
//! Provides standalone sign/verify functions that operate on a scalar
//! private key and a message scalar, without requiring the
//! `PrivateKey`/`PublicKey` wrappers. Nonces come either from a
//! cryptographically secure RNG or from the RFC 6979 HMAC-SHA256 generator.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::curve::arith::{add_mod, mod_inverse, mul_mod};
use crate::curve::{Curve, CurvePoint};
use crate::ec::signature::Signature;
use crate::hash::sha256_hmac;
use crate::PrimitivesError;

/// Sign a message scalar with a fresh random nonce from the OS RNG.
///
/// # Arguments
/// * `curve` - Domain parameters.
/// * `d` - Private scalar in `[1, N)`.
/// * `m` - Integer value of the pre-hashed message.
///
/// # Returns
/// A low-S `Signature`, or `PrimitivesError::InvalidScalar` if `d` is out of range.
pub fn sign(curve: &Curve, d: &BigUint, m: &BigUint) -> Result<Signature, PrimitivesError> {
    sign_with_rng(curve, d, m, &mut OsRng)
}

/// Sign a message scalar, drawing nonces from `rng`.
///
/// Retries with a new nonce whenever `r` or `s` comes out as zero.
pub fn sign_with_rng<R: RngCore + CryptoRng>(
    curve: &Curve,
    d: &BigUint,
    m: &BigUint,
    rng: &mut R,
) -> Result<Signature, PrimitivesError> {
    curve.check_scalar(d)?;
    loop {
        let k = random_scalar(curve, rng);
        match sign_with_nonce(curve, d, m, &k)? {
            Some(sig) => return Ok(sig),
            None => tracing::debug!("ecdsa nonce produced r = 0 or s = 0, retrying"),
        }
    }
}

/// Sign a message digest with an RFC 6979 deterministic nonce (HMAC-SHA256).
///
/// The same key and digest always produce the same signature.
///
/// # Arguments
/// * `curve` - Domain parameters.
/// * `d` - Private scalar in `[1, N)`.
/// * `hash` - The message digest, converted with `bits2int`.
///
/// # Returns
/// A low-S `Signature`, or `PrimitivesError::InvalidScalar` if `d` is out of range.
pub fn sign_deterministic(
    curve: &Curve,
    d: &BigUint,
    hash: &[u8],
) -> Result<Signature, PrimitivesError> {
    curve.check_scalar(d)?;
    let m = message_scalar(curve, hash);
    let mut nonces = NonceGenerator::new(curve, d, hash);
    loop {
        let k = nonces.next_nonce();
        match sign_with_nonce(curve, d, &m, &k)? {
            Some(sig) => return Ok(sig),
            None => tracing::debug!("rfc6979 nonce produced r = 0 or s = 0, retrying"),
        }
    }
}

/// Verify an ECDSA signature.
///
/// # Arguments
/// * `curve` - Domain parameters.
/// * `q` - The signer's public point.
/// * `m` - Integer value of the pre-hashed message.
/// * `sig` - The signature to check.
///
/// # Returns
/// `Ok(true)` if the signature is valid and `Ok(false)` if it is well formed
/// but does not match. `PrimitivesError::InvalidSignatureFormat` is returned
/// for R or S outside `[1, N)`, and `PrimitivesError::InvalidPublicKey` for a
/// public point that is the identity or off the curve.
pub fn verify(
    curve: &Curve,
    q: &CurvePoint,
    m: &BigUint,
    sig: &Signature,
) -> Result<bool, PrimitivesError> {
    let n = curve.n();
    for (name, v) in [("R", sig.r()), ("S", sig.s())] {
        if v.is_zero() || v >= n {
            return Err(PrimitivesError::InvalidSignatureFormat(format!(
                "signature {} is outside [1, N)",
                name
            )));
        }
    }
    if q.is_infinity() || !curve.is_on_curve(q) {
        return Err(PrimitivesError::InvalidPublicKey(
            "public key is not a curve point".to_string(),
        ));
    }

    let w = mod_inverse(sig.s(), n)?;
    let u1 = mul_mod(m, &w, n);
    let u2 = mul_mod(sig.r(), &w, n);
    let p = curve.add(&curve.multiply_base(&u1)?, &curve.multiply(&u2, q)?)?;

    match p.as_affine() {
        Some(p) => Ok(&(p.x() % n) == sig.r()),
        None => Ok(false),
    }
}

/// Interpret a message digest as an integer (`bits2int`).
///
/// Digests wider than the group order keep their leftmost `bitlen(N)` bits;
/// shorter digests are read as-is.
pub fn message_scalar(curve: &Curve, hash: &[u8]) -> BigUint {
    bits2int(hash, curve.n().bits())
}

/// Draw a uniform scalar in `[1, N)` by rejection sampling.
pub fn random_scalar<R: RngCore + CryptoRng>(curve: &Curve, rng: &mut R) -> BigUint {
    let n = curve.n();
    let bits = n.bits();
    let len = ((bits + 7) / 8) as usize;
    let excess = len as u64 * 8 - bits;
    let mut buf = vec![0u8; len];
    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= 0xff >> excess;
        let k = BigUint::from_bytes_be(&buf);
        if !k.is_zero() && &k < n {
            return k;
        }
        tracing::trace!("rejected out-of-range scalar candidate");
    }
}

/// One signing attempt with nonce `k`. `None` means `r` or `s` was zero.
fn sign_with_nonce(
    curve: &Curve,
    d: &BigUint,
    m: &BigUint,
    k: &BigUint,
) -> Result<Option<Signature>, PrimitivesError> {
    let n = curve.n();
    let r = match curve.multiply_base(k)?.as_affine() {
        Some(point) => point.x() % n,
        None => return Ok(None),
    };
    if r.is_zero() {
        return Ok(None);
    }

    let k_inv = mod_inverse(k, n)?;
    let s = mul_mod(&k_inv, &add_mod(m, &mul_mod(&r, d, n), n), n);
    if s.is_zero() {
        return Ok(None);
    }

    let s = if &s > curve.half_n() { n - s } else { s };
    Ok(Some(Signature::new_unchecked(r, s)))
}

fn bits2int(data: &[u8], qlen: u64) -> BigUint {
    let v = BigUint::from_bytes_be(data);
    let vlen = data.len() as u64 * 8;
    if vlen > qlen {
        v >> (vlen - qlen) as usize
    } else {
        v
    }
}

fn int2octets(v: &BigUint, len: usize) -> Vec<u8> {
    let bytes = v.to_bytes_be();
    let mut out = vec![0u8; len.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes[bytes.len().saturating_sub(len)..]);
    out
}

/// RFC 6979 section 3.2 nonce stream, with HMAC-SHA256 as the PRF.
struct NonceGenerator {
    k: [u8; 32],
    v: [u8; 32],
    qlen: u64,
    n: BigUint,
    started: bool,
}

impl NonceGenerator {
    fn new(curve: &Curve, d: &BigUint, hash: &[u8]) -> Self {
        let n = curve.n().clone();
        let qlen = n.bits();
        let rolen = ((qlen + 7) / 8) as usize;
        let x = int2octets(d, rolen);
        let h1 = int2octets(&(bits2int(hash, qlen) % &n), rolen);

        let mut k = [0u8; 32];
        let mut v = [1u8; 32];
        k = sha256_hmac(&k, &[&v, &[0x00], &x, &h1]);
        v = sha256_hmac(&k, &[&v]);
        k = sha256_hmac(&k, &[&v, &[0x01], &x, &h1]);
        v = sha256_hmac(&k, &[&v]);

        NonceGenerator {
            k,
            v,
            qlen,
            n,
            started: false,
        }
    }

    fn next_nonce(&mut self) -> BigUint {
        loop {
            if self.started {
                self.k = sha256_hmac(&self.k, &[&self.v, &[0x00]]);
                self.v = sha256_hmac(&self.k, &[&self.v]);
            }
            self.started = true;

            // qlen never exceeds 256, so one HMAC block covers it.
            self.v = sha256_hmac(&self.k, &[&self.v]);
            let candidate = bits2int(&self.v, self.qlen);
            if !candidate.is_zero() && candidate < self.n {
                return candidate;
            }
        }
    }
}
