//! Modular arithmetic over arbitrary-precision unsigned integers.
//!
//! The same functions serve both field elements (modulus P) and scalars
//! (modulus N). Callers pass the modulus explicitly; nothing here guesses
//! which one is meant.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::PrimitivesError;

/// Reduce a signed integer into `[0, m)`.
///
/// # Arguments
/// * `a` - Any signed integer.
/// * `m` - A non-zero modulus.
///
/// # Returns
/// The canonical residue of `a` modulo `m`.
pub fn modulo(a: &BigInt, m: &BigUint) -> BigUint {
    let m = BigInt::from(m.clone());
    let mut r = a % &m;
    if r.is_negative() {
        r += &m;
    }
    r.into_parts().1
}

/// `(a + b) mod m`
pub fn add_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a + b) % m
}

/// `(a - b) mod m`, always non-negative.
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    let b = b % m;
    if a >= b {
        a - b
    } else {
        m - b + a
    }
}

/// `(a * b) mod m`
pub fn mul_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    (a * b) % m
}

/// `base^exp mod m`
pub fn pow_mod(base: &BigUint, exp: &BigUint, m: &BigUint) -> BigUint {
    base.modpow(exp, m)
}

/// Compute the multiplicative inverse of `a` modulo `m` with the extended
/// Euclidean algorithm.
///
/// # Arguments
/// * `a` - The value to invert.
/// * `m` - The modulus (P for coordinates, N for signature math).
///
/// # Returns
/// `Ok(a⁻¹ mod m)`, or `PrimitivesError::NoInverse` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, PrimitivesError> {
    if m.is_zero() {
        return Err(PrimitivesError::NoInverse);
    }

    let mut old_r = BigInt::from(a % m);
    let mut r = BigInt::from(m.clone());
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(PrimitivesError::NoInverse);
    }
    Ok(modulo(&old_s, m))
}

/// Serialize an integer as exactly 32 big-endian bytes, left-padded with zeros.
///
/// Values wider than 256 bits keep their low 32 bytes; every field element
/// and scalar handled by this crate fits.
pub fn to_bytes32(v: &BigUint) -> [u8; 32] {
    let bytes = v.to_bytes_be();
    let mut out = [0u8; 32];
    if bytes.len() >= 32 {
        out.copy_from_slice(&bytes[bytes.len() - 32..]);
    } else {
        out[32 - bytes.len()..].copy_from_slice(&bytes);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_modulo_negative() {
        assert_eq!(modulo(&BigInt::from(-3), &n(17)), n(14));
        assert_eq!(modulo(&BigInt::from(-34), &n(17)), n(0));
        assert_eq!(modulo(&BigInt::from(20), &n(17)), n(3));
    }

    #[test]
    fn test_sub_mod_wraps() {
        assert_eq!(sub_mod(&n(3), &n(5), &n(17)), n(15));
        assert_eq!(sub_mod(&n(5), &n(3), &n(17)), n(2));
        assert_eq!(sub_mod(&n(40), &n(6), &n(17)), n(0));
    }

    #[test]
    fn test_add_mul_pow() {
        assert_eq!(add_mod(&n(10), &n(9), &n(17)), n(2));
        assert_eq!(mul_mod(&n(10), &n(9), &n(17)), n(5));
        assert_eq!(pow_mod(&n(3), &n(4), &n(17)), n(13));
    }

    #[test]
    fn test_mod_inverse_small() {
        assert_eq!(mod_inverse(&n(3), &n(11)).unwrap(), n(4));
        assert_eq!(mod_inverse(&n(10), &n(17)).unwrap(), n(12));
        // Inputs above the modulus are reduced first.
        assert_eq!(mod_inverse(&n(14), &n(11)).unwrap(), n(4));
    }

    #[test]
    fn test_mod_inverse_not_invertible() {
        assert_eq!(mod_inverse(&n(0), &n(17)), Err(PrimitivesError::NoInverse));
        assert_eq!(mod_inverse(&n(6), &n(9)), Err(PrimitivesError::NoInverse));
        assert_eq!(mod_inverse(&n(5), &n(0)), Err(PrimitivesError::NoInverse));
    }

    #[test]
    fn test_mod_inverse_large_prime() {
        let p = BigUint::parse_bytes(
            b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
            16,
        )
        .unwrap();
        let a = BigUint::parse_bytes(b"123456789abcdef0123456789abcdef", 16).unwrap();
        let inv = mod_inverse(&a, &p).unwrap();
        assert_eq!(mul_mod(&a, &inv, &p), BigUint::one());
    }

    #[test]
    fn test_to_bytes32_pads_left() {
        let out = to_bytes32(&n(0x0102));
        assert_eq!(out[..30], [0u8; 30]);
        assert_eq!(out[30..], [0x01, 0x02]);
        assert_eq!(to_bytes32(&BigUint::zero()), [0u8; 32]);
    }
}
