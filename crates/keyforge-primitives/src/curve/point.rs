//! Curve points and the group law.
//!
//! [`CurvePoint`] is either the identity (`Infinity`) or an affine point
//! that satisfies the curve equation. Addition and doubling are total over
//! both variants, so adding a point to its inverse yields `Infinity`
//! rather than a bogus affine result. Code that needs an encodable point
//! converts with [`CurvePoint::to_affine`] and gets
//! [`PrimitivesError::PointAtInfinity`] for the identity.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use super::arith::{add_mod, mod_inverse, modulo, mul_mod, pow_mod, sub_mod, to_bytes32};
use super::params::Curve;
use crate::PrimitivesError;

/// Length of a compressed SEC1 point: prefix byte + 32-byte x.
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed SEC1 point: `0x04` + 32-byte x + 32-byte y.
pub const UNCOMPRESSED_LEN: usize = 65;

/// An affine point `(x, y)` with both coordinates reduced modulo P.
///
/// Only the curve engine constructs these, so every instance lies on the
/// curve it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AffinePoint {
    x: BigUint,
    y: BigUint,
}

impl AffinePoint {
    pub(crate) fn new_unchecked(x: BigUint, y: BigUint) -> Self {
        AffinePoint { x, y }
    }

    /// The x coordinate.
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// The y coordinate.
    pub fn y(&self) -> &BigUint {
        &self.y
    }

    /// The x coordinate as 32 big-endian bytes.
    pub fn x_bytes(&self) -> [u8; 32] {
        to_bytes32(&self.x)
    }

    /// The y coordinate as 32 big-endian bytes.
    pub fn y_bytes(&self) -> [u8; 32] {
        to_bytes32(&self.y)
    }

    /// Whether y is even, which selects the `0x02` compression prefix.
    pub fn has_even_y(&self) -> bool {
        !self.y.bit(0)
    }

    /// SEC1 compressed encoding.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out[0] = if self.has_even_y() { 0x02 } else { 0x03 };
        out[1..].copy_from_slice(&self.x_bytes());
        out
    }

    /// SEC1 uncompressed encoding.
    ///
    /// x and y are each padded to 32 bytes on their own, so a short
    /// coordinate never shifts the other one.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x_bytes());
        out[33..].copy_from_slice(&self.y_bytes());
        out
    }
}

/// A point on a short Weierstrass curve, including the identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CurvePoint {
    /// The point at infinity, neutral element of the group.
    Infinity,
    /// A finite point.
    Affine(AffinePoint),
}

impl CurvePoint {
    /// Whether this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    /// Borrow the affine coordinates, if any.
    pub fn as_affine(&self) -> Option<&AffinePoint> {
        match self {
            CurvePoint::Infinity => None,
            CurvePoint::Affine(p) => Some(p),
        }
    }

    /// Borrow the affine coordinates or fail for the identity.
    pub fn to_affine(&self) -> Result<&AffinePoint, PrimitivesError> {
        self.as_affine().ok_or(PrimitivesError::PointAtInfinity)
    }
}

impl From<AffinePoint> for CurvePoint {
    fn from(p: AffinePoint) -> Self {
        CurvePoint::Affine(p)
    }
}

impl Curve {
    /// Check the curve equation `y² ≡ x³ + A·x + B (mod P)`.
    ///
    /// The identity is considered on every curve.
    pub fn is_on_curve(&self, point: &CurvePoint) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine(pt) => {
                if pt.x >= *self.p() || pt.y >= *self.p() {
                    return false;
                }
                let lhs = mul_mod(&pt.y, &pt.y, self.p());
                lhs == self.curve_rhs(&pt.x)
            }
        }
    }

    /// Build a validated affine point from raw coordinates.
    ///
    /// # Returns
    /// `Ok(CurvePoint::Affine)` if `(x, y)` satisfies the curve equation,
    /// otherwise `PrimitivesError::InvalidPublicKey`.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<CurvePoint, PrimitivesError> {
        let candidate = CurvePoint::Affine(AffinePoint::new_unchecked(x, y));
        if !self.is_on_curve(&candidate) {
            return Err(PrimitivesError::InvalidPublicKey(
                "point is not on the curve".to_string(),
            ));
        }
        Ok(candidate)
    }

    /// Additive inverse: `(x, y) -> (x, P - y)`.
    pub fn negate(&self, point: &CurvePoint) -> CurvePoint {
        match point {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine(pt) => CurvePoint::Affine(AffinePoint::new_unchecked(
                pt.x.clone(),
                sub_mod(&BigUint::zero(), &pt.y, self.p()),
            )),
        }
    }

    /// Point doubling.
    ///
    /// Slope `λ = (3x² + A) · (2y)⁻¹ mod P`. A point with `y = 0` has a
    /// vertical tangent and doubles to the identity. secp256k1 has no such
    /// point, but other parameter sets may.
    pub fn double(&self, point: &CurvePoint) -> Result<CurvePoint, PrimitivesError> {
        let pt = match point {
            CurvePoint::Infinity => return Ok(CurvePoint::Infinity),
            CurvePoint::Affine(pt) => pt,
        };
        if pt.y.is_zero() {
            return Ok(CurvePoint::Infinity);
        }
        let p = self.p();

        let three_x2 = mul_mod(&BigUint::from(3u8), &mul_mod(&pt.x, &pt.x, p), p);
        let numerator = add_mod(&three_x2, self.a(), p);
        let denominator = mod_inverse(&mul_mod(&BigUint::from(2u8), &pt.y, p), p)?;
        let lambda = mul_mod(&numerator, &denominator, p);

        Ok(self.chord_point(&lambda, pt, &pt.x))
    }

    /// Point addition.
    ///
    /// Equal points delegate to [`Curve::double`]; points sharing an x
    /// coordinate with different y are inverses and sum to the identity.
    /// Otherwise `λ = (y2 - y1) · (x2 - x1)⁻¹ mod P`.
    pub fn add(&self, p1: &CurvePoint, p2: &CurvePoint) -> Result<CurvePoint, PrimitivesError> {
        let (a, b) = match (p1, p2) {
            (CurvePoint::Infinity, _) => return Ok(p2.clone()),
            (_, CurvePoint::Infinity) => return Ok(p1.clone()),
            (CurvePoint::Affine(a), CurvePoint::Affine(b)) => (a, b),
        };
        if a.x == b.x {
            if a.y == b.y {
                return self.double(p1);
            }
            return Ok(CurvePoint::Infinity);
        }
        let p = self.p();

        let numerator = sub_mod(&b.y, &a.y, p);
        let denominator = mod_inverse(&sub_mod(&b.x, &a.x, p), p)?;
        let lambda = mul_mod(&numerator, &denominator, p);

        Ok(self.chord_point(&lambda, a, &b.x))
    }

    /// Scalar multiplication `k·point` by binary double-and-add.
    ///
    /// Scans the bits of `k` from the second most significant one down.
    /// `k = 0` or an identity input gives the identity.
    pub fn multiply(&self, k: &BigUint, point: &CurvePoint) -> Result<CurvePoint, PrimitivesError> {
        if k.is_zero() || point.is_infinity() {
            return Ok(CurvePoint::Infinity);
        }
        let mut acc = point.clone();
        for i in (0..k.bits() - 1).rev() {
            acc = self.double(&acc)?;
            if k.bit(i) {
                acc = self.add(&acc, point)?;
            }
        }
        Ok(acc)
    }

    /// `k·G`
    pub fn multiply_base(&self, k: &BigUint) -> Result<CurvePoint, PrimitivesError> {
        self.multiply(k, self.generator())
    }

    /// SEC1 compressed encoding of a finite point.
    pub fn compress(&self, point: &CurvePoint) -> Result<[u8; COMPRESSED_LEN], PrimitivesError> {
        Ok(point.to_affine()?.to_compressed())
    }

    /// Recover a point from its 33-byte compressed encoding.
    ///
    /// Solves `y² = x³ + A·x + B` with the `P ≡ 3 (mod 4)` square root
    /// `y = (y²)^((P+1)/4)` and picks the root whose parity matches the
    /// prefix byte.
    ///
    /// # Returns
    /// The decoded point, or `PrimitivesError::InvalidPublicKey` for a bad
    /// length or prefix, an out-of-range x, or an x with no curve point.
    pub fn decompress(&self, bytes: &[u8]) -> Result<CurvePoint, PrimitivesError> {
        if bytes.len() != COMPRESSED_LEN {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "compressed key must be {} bytes, got {}",
                COMPRESSED_LEN,
                bytes.len()
            )));
        }
        let want_odd = match bytes[0] {
            0x02 => false,
            0x03 => true,
            other => {
                return Err(PrimitivesError::InvalidPublicKey(format!(
                    "unknown compression prefix 0x{:02x}",
                    other
                )))
            }
        };
        let p = self.p();
        if !(p.bit(0) && p.bit(1)) {
            return Err(PrimitivesError::InvalidPublicKey(
                "square root needs P = 3 mod 4".to_string(),
            ));
        }

        let x = BigUint::from_bytes_be(&bytes[1..]);
        if &x >= p {
            return Err(PrimitivesError::InvalidPublicKey(
                "x coordinate is not below P".to_string(),
            ));
        }

        let y_squared = self.curve_rhs(&x);
        let exp = (p + BigUint::one()) >> 2;
        let mut y = pow_mod(&y_squared, &exp, p);
        if mul_mod(&y, &y, p) != y_squared {
            tracing::debug!("rejected compressed key: x has no square root");
            return Err(PrimitivesError::InvalidPublicKey(
                "point is not on the curve".to_string(),
            ));
        }
        if y.bit(0) != want_odd {
            if y.is_zero() {
                return Err(PrimitivesError::InvalidPublicKey(
                    "odd prefix for a zero y coordinate".to_string(),
                ));
            }
            y = p - &y;
        }
        self.point(x, y)
    }

    /// `x³ + A·x + B mod P`
    fn curve_rhs(&self, x: &BigUint) -> BigUint {
        let p = self.p();
        let x3 = mul_mod(&mul_mod(x, x, p), x, p);
        add_mod(&add_mod(&x3, &mul_mod(self.a(), x, p), p), self.b(), p)
    }

    /// Third intersection of the line with slope `lambda` through `from`,
    /// reflected: `x3 = λ² - x1 - x2`, `y3 = λ(x1 - x3) - y1`.
    fn chord_point(&self, lambda: &BigUint, from: &AffinePoint, other_x: &BigUint) -> CurvePoint {
        let p = self.p();
        let lambda_i = BigInt::from(lambda.clone());
        let x1 = BigInt::from(from.x.clone());
        let y1 = BigInt::from(from.y.clone());

        let x3 = modulo(&(&lambda_i * &lambda_i - &x1 - BigInt::from(other_x.clone())), p);
        let y3 = modulo(&(&lambda_i * (&x1 - BigInt::from(x3.clone())) - &y1), p);
        CurvePoint::Affine(AffinePoint::new_unchecked(x3, y3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    /// y² = x³ + 2x + 2 over F17, G = (5, 1) of order 19.
    fn toy_curve() -> Curve {
        Curve::new(n(2), n(2), n(17), n(19), n(5), n(1)).unwrap()
    }

    fn affine(curve: &Curve, x: u64, y: u64) -> CurvePoint {
        curve.point(n(x), n(y)).unwrap()
    }

    #[test]
    fn test_toy_curve_doubling_and_addition() {
        let curve = toy_curve();
        let g = curve.generator().clone();
        assert_eq!(curve.double(&g).unwrap(), affine(&curve, 6, 3));
        let g3 = curve.add(&affine(&curve, 6, 3), &g).unwrap();
        assert_eq!(g3, affine(&curve, 10, 6));
        assert_eq!(curve.multiply(&n(3), &g).unwrap(), g3);
    }

    #[test]
    fn test_toy_curve_order_reaches_identity() {
        let curve = toy_curve();
        let g = curve.generator();
        assert_eq!(curve.multiply(&n(19), g).unwrap(), CurvePoint::Infinity);
        assert_eq!(curve.multiply(&n(20), g).unwrap(), g.clone());
        assert_eq!(curve.multiply(&n(18), g).unwrap(), curve.negate(g));
    }

    #[test]
    fn test_add_inverse_points_is_identity() {
        let curve = toy_curve();
        let g = curve.generator();
        let neg = curve.negate(g);
        assert!(curve.is_on_curve(&neg));
        assert_eq!(curve.add(g, &neg).unwrap(), CurvePoint::Infinity);
    }

    #[test]
    fn test_identity_is_neutral() {
        let curve = toy_curve();
        let g = curve.generator();
        assert_eq!(curve.add(&CurvePoint::Infinity, g).unwrap(), g.clone());
        assert_eq!(curve.add(g, &CurvePoint::Infinity).unwrap(), g.clone());
        assert_eq!(curve.double(&CurvePoint::Infinity).unwrap(), CurvePoint::Infinity);
        assert_eq!(curve.multiply(&n(0), g).unwrap(), CurvePoint::Infinity);
        assert_eq!(
            curve.multiply(&n(5), &CurvePoint::Infinity).unwrap(),
            CurvePoint::Infinity
        );
    }

    #[test]
    fn test_double_vertical_tangent() {
        // y² = x³ + 7 over F17 has (3, 0).
        let curve = Curve::new(n(0), n(7), n(17), n(18), n(3), n(0)).unwrap();
        let pt = curve.generator();
        assert_eq!(curve.double(pt).unwrap(), CurvePoint::Infinity);
    }

    #[test]
    fn test_point_rejects_off_curve() {
        let curve = toy_curve();
        assert!(curve.point(n(5), n(2)).is_err());
        assert!(curve.point(n(22), n(1)).is_err());
    }

    #[test]
    fn test_secp256k1_known_multiples() {
        let curve = Curve::secp256k1();
        let two_g = curve.multiply_base(&n(2)).unwrap();
        let pt = two_g.to_affine().unwrap();
        assert_eq!(
            hex::encode(pt.x_bytes()),
            "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"
        );
        assert_eq!(
            hex::encode(pt.y_bytes()),
            "1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a"
        );

        let three_g = curve.multiply_base(&n(3)).unwrap();
        assert_eq!(
            hex::encode(three_g.to_affine().unwrap().x_bytes()),
            "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
        assert_eq!(curve.add(&two_g, curve.generator()).unwrap(), three_g);
    }

    #[test]
    fn test_secp256k1_order_times_generator() {
        let curve = Curve::secp256k1();
        assert_eq!(curve.multiply_base(curve.n()).unwrap(), CurvePoint::Infinity);
        let n_minus_one = curve.n() - 1u8;
        assert_eq!(
            curve.multiply_base(&n_minus_one).unwrap(),
            curve.negate(curve.generator())
        );
    }

    #[test]
    fn test_compress_decompress_generator() {
        let curve = Curve::secp256k1();
        let compressed = curve.compress(curve.generator()).unwrap();
        assert_eq!(
            hex::encode(compressed),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(&curve.decompress(&compressed).unwrap(), curve.generator());

        let mut odd = compressed;
        odd[0] = 0x03;
        assert_eq!(curve.decompress(&odd).unwrap(), curve.negate(curve.generator()));
    }

    #[test]
    fn test_compress_identity_fails() {
        let curve = Curve::secp256k1();
        assert_eq!(
            curve.compress(&CurvePoint::Infinity),
            Err(PrimitivesError::PointAtInfinity)
        );
    }

    #[test]
    fn test_decompress_rejects_bad_input() {
        let curve = Curve::secp256k1();
        let mut bytes = curve.compress(curve.generator()).unwrap();

        assert!(curve.decompress(&bytes[..32]).is_err());

        bytes[0] = 0x04;
        assert!(curve.decompress(&bytes).is_err());

        // x = 5 gives x³ + 7 = 132, which is not a square mod P.
        let mut no_root = [0u8; 33];
        no_root[0] = 0x02;
        no_root[32] = 0x05;
        assert!(matches!(
            curve.decompress(&no_root),
            Err(PrimitivesError::InvalidPublicKey(_))
        ));

        let mut too_big = [0xFFu8; 33];
        too_big[0] = 0x02;
        assert!(curve.decompress(&too_big).is_err());
    }

    #[test]
    fn test_uncompressed_pads_each_coordinate() {
        let pt = AffinePoint::new_unchecked(n(1), BigUint::from_bytes_be(&[0xAB; 32]));
        let out = pt.to_uncompressed();
        assert_eq!(out[0], 0x04);
        assert_eq!(out[1..32], [0u8; 31]);
        assert_eq!(out[32], 0x01);
        assert_eq!(out[33..], [0xAB; 32]);
    }
}
