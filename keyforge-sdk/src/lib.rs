#![deny(missing_docs)]

//! Keyforge SDK - Complete SDK.
//!
//! Re-exports the keyforge components for convenient single-crate usage.

pub use keyforge_primitives as primitives;
pub use keyforge_address as address;
