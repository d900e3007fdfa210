//! Keyforge - Network-aware Bitcoin addresses and WIF keys.
//!
//! Builds on `keyforge-primitives` to provide:
//! - The supported networks and their version bytes / Bech32 prefixes
//! - P2PKH, P2SH, P2SH-P2WPKH, P2WPKH and P2WSH addresses with parsing
//! - WIF private keys bound to a network

pub mod address;
pub mod network;
pub mod wif;

mod error;

pub use address::{Address, AddressKind};
pub use error::AddressError;
pub use network::Network;
pub use wif::WifKey;
