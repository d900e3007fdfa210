//! Keyforge - Cryptographic primitives for secp256k1 keys and Bitcoin text encodings.
//!
//! This crate provides the building blocks for the Keyforge SDK:
//! - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160, HMAC-SHA256)
//! - Modular arithmetic and the secp256k1 curve engine, with explicit identity
//! - Private and public keys, SEC1 compression, WIF
//! - ECDSA (random and RFC 6979 nonces), strict DER, experimental Schnorr
//! - Base58 / Base58Check
//! - Bech32 (BIP-173) and SegWit witness programs

pub mod hash;
pub mod curve;
pub mod ec;
pub mod ecdsa;
pub mod schnorr;
pub mod base58;
pub mod bech32;

mod error;
pub use error::PrimitivesError;
