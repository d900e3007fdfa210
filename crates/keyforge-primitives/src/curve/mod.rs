//! secp256k1 curve engine.
//!
//! Modular arithmetic, curve domain parameters, and affine point
//! arithmetic with an explicit point at infinity.

pub mod arith;
pub mod params;
pub mod point;

pub use params::Curve;
pub use point::{AffinePoint, CurvePoint, COMPRESSED_LEN, UNCOMPRESSED_LEN};
