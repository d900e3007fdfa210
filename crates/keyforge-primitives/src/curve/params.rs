//! Curve domain parameters.
//!
//! A [`Curve`] is an immutable value holding `y² = x³ + A·x + B` over the
//! prime field P, together with the base point G and its order N. The
//! engine operations in [`crate::curve::point`] are methods on `&Curve`,
//! so the same code runs against secp256k1 or any test curve.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use super::arith::{add_mod, mul_mod};
use super::point::{AffinePoint, CurvePoint};
use crate::PrimitivesError;

/// secp256k1 field prime P = 2^256 - 2^32 - 977.
const SECP256K1_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF,
    0xFC, 0x2F,
];

/// secp256k1 group order N.
const SECP256K1_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// x coordinate of the secp256k1 base point G.
const SECP256K1_GX: [u8; 32] = [
    0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87, 0x0B,
    0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16, 0xF8,
    0x17, 0x98,
];

/// y coordinate of the secp256k1 base point G.
const SECP256K1_GY: [u8; 32] = [
    0x48, 0x3A, 0xDA, 0x77, 0x26, 0xA3, 0xC4, 0x65, 0x5D, 0xA4, 0xFB, 0xFC, 0x0E, 0x11, 0x08,
    0xA8, 0xFD, 0x17, 0xB4, 0x48, 0xA6, 0x85, 0x54, 0x19, 0x9C, 0x47, 0xD0, 0x8F, 0xFB, 0x10,
    0xD4, 0xB8,
];

static SECP256K1: Lazy<Curve> = Lazy::new(|| {
    let g = AffinePoint::new_unchecked(
        BigUint::from_bytes_be(&SECP256K1_GX),
        BigUint::from_bytes_be(&SECP256K1_GY),
    );
    Curve::from_parts(
        BigUint::zero(),
        BigUint::from(7u8),
        BigUint::from_bytes_be(&SECP256K1_P),
        BigUint::from_bytes_be(&SECP256K1_N),
        g,
    )
});

/// Short Weierstrass curve domain parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Curve {
    a: BigUint,
    b: BigUint,
    p: BigUint,
    n: BigUint,
    half_n: BigUint,
    g: CurvePoint,
}

impl Curve {
    /// The shared secp256k1 parameter set.
    pub fn secp256k1() -> &'static Curve {
        &SECP256K1
    }

    /// Build a curve from explicit parameters.
    ///
    /// # Arguments
    /// * `a`, `b` - Curve coefficients, reduced modulo `p`.
    /// * `p` - Field prime, at most 256 bits.
    /// * `n` - Order of the base point, at most 256 bits.
    /// * `gx`, `gy` - Base point coordinates.
    ///
    /// # Returns
    /// `Ok(Curve)`, or `PrimitivesError::InvalidCurve` if the curve is
    /// singular, the sizes are unsupported, or G is not on the curve.
    pub fn new(
        a: BigUint,
        b: BigUint,
        p: BigUint,
        n: BigUint,
        gx: BigUint,
        gy: BigUint,
    ) -> Result<Self, PrimitivesError> {
        if p <= BigUint::from(3u8) || p.bits() > 256 {
            return Err(PrimitivesError::InvalidCurve(
                "field prime must be in (3, 2^256)".to_string(),
            ));
        }
        if n <= BigUint::one() || n.bits() > 256 {
            return Err(PrimitivesError::InvalidCurve(
                "group order must be in (1, 2^256)".to_string(),
            ));
        }
        let a = a % &p;
        let b = b % &p;

        // 4a³ + 27b² != 0 (mod p)
        let a3 = mul_mod(&mul_mod(&a, &a, &p), &a, &p);
        let disc = add_mod(
            &mul_mod(&BigUint::from(4u8), &a3, &p),
            &mul_mod(&BigUint::from(27u8), &mul_mod(&b, &b, &p), &p),
            &p,
        );
        if disc.is_zero() {
            return Err(PrimitivesError::InvalidCurve("curve is singular".to_string()));
        }
        if gx >= p || gy >= p {
            return Err(PrimitivesError::InvalidCurve(
                "base point coordinates out of range".to_string(),
            ));
        }

        let curve = Curve::from_parts(a, b, p, n, AffinePoint::new_unchecked(gx, gy));
        if !curve.is_on_curve(&curve.g) {
            return Err(PrimitivesError::InvalidCurve(
                "base point is not on the curve".to_string(),
            ));
        }
        Ok(curve)
    }

    fn from_parts(a: BigUint, b: BigUint, p: BigUint, n: BigUint, g: AffinePoint) -> Self {
        let half_n = &n >> 1;
        Curve {
            a,
            b,
            p,
            n,
            half_n,
            g: CurvePoint::Affine(g),
        }
    }

    /// Coefficient A.
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Coefficient B.
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Field prime P.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Group order N.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// `floor(N / 2)`, the low-S threshold.
    pub fn half_n(&self) -> &BigUint {
        &self.half_n
    }

    /// Base point G.
    pub fn generator(&self) -> &CurvePoint {
        &self.g
    }

    /// Check that `k` is a usable non-zero scalar, i.e. `k ∈ [1, N)`.
    pub fn check_scalar(&self, k: &BigUint) -> Result<(), PrimitivesError> {
        if k.is_zero() {
            return Err(PrimitivesError::InvalidScalar("scalar is zero".to_string()));
        }
        if k >= &self.n {
            return Err(PrimitivesError::InvalidScalar(
                "scalar is not below the group order".to_string(),
            ));
        }
        Ok(())
    }
}
