//! Bitcoin address handling.
//!
//! Supports legacy Base58Check addresses (P2PKH, P2SH, and P2SH-wrapped
//! P2WPKH) and native SegWit v0 Bech32 addresses (P2WPKH, P2WSH), plus
//! parsing any of them back with network and kind detection.

use std::fmt;

use keyforge_primitives::base58;
use keyforge_primitives::bech32;
use keyforge_primitives::ec::PublicKey;
use keyforge_primitives::hash::{hash160, sha256};

use crate::{AddressError, Network};

/// Length of a P2PKH / P2SH / P2WPKH hash payload.
const HASH160_LEN: usize = 20;

/// Length of a P2WSH script hash.
const SHA256_LEN: usize = 32;

/// Witness version of the address types built here.
const WITNESS_V0: u8 = 0;

/// The locking-script template an address commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Pay to public key hash (Base58Check).
    P2pkh,
    /// Pay to script hash (Base58Check); also used for nested SegWit.
    P2sh,
    /// Pay to witness public key hash (Bech32, v0, 20 bytes).
    P2wpkh,
    /// Pay to witness script hash (Bech32, v0, 32 bytes).
    P2wsh,
}

/// A Bitcoin address.
///
/// Holds the encoded string together with the network, the kind and the
/// hash payload it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// The encoded address string (Bech32 addresses in lowercase).
    pub address_string: String,
    /// The network this address belongs to.
    pub network: Network,
    /// The address kind.
    pub kind: AddressKind,
    /// The 20-byte hash160 or 32-byte witness script hash.
    pub payload: Vec<u8>,
}

impl Address {
    /// Create a P2PKH address for a public key (hash160 of its compressed form).
    pub fn p2pkh(pub_key: &PublicKey, network: Network) -> Self {
        Self::from_public_key_hash(&pub_key.hash160(), network)
    }

    /// Create a P2PKH address from a 20-byte public key hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of the public key.
    /// * `network` - The target network.
    pub fn from_public_key_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::base58(AddressKind::P2pkh, network.p2pkh_prefix(), hash, network)
    }

    /// Create a P2SH address committing to `redeem_script`.
    pub fn p2sh(redeem_script: &[u8], network: Network) -> Self {
        Self::from_script_hash(&hash160(redeem_script), network)
    }

    /// Create a P2SH address from a 20-byte script hash.
    pub fn from_script_hash(hash: &[u8; 20], network: Network) -> Self {
        Self::base58(AddressKind::P2sh, network.p2sh_prefix(), hash, network)
    }

    /// Create a nested SegWit (P2SH-P2WPKH) address for a public key.
    ///
    /// The redeem script is the v0 witness program `0x00 0x14 <hash160(pubkey)>`.
    pub fn p2sh_p2wpkh(pub_key: &PublicKey, network: Network) -> Self {
        let mut redeem_script = Vec::with_capacity(2 + HASH160_LEN);
        redeem_script.push(WITNESS_V0);
        redeem_script.push(HASH160_LEN as u8);
        redeem_script.extend_from_slice(&pub_key.hash160());
        Self::p2sh(&redeem_script, network)
    }

    /// Create a native SegWit P2WPKH address for a public key.
    pub fn p2wpkh(pub_key: &PublicKey, network: Network) -> Result<Self, AddressError> {
        Self::from_witness_program(WITNESS_V0, &pub_key.hash160(), network)
    }

    /// Create a native SegWit P2WSH address committing to `witness_script`.
    pub fn p2wsh(witness_script: &[u8], network: Network) -> Result<Self, AddressError> {
        Self::from_witness_program(WITNESS_V0, &sha256(witness_script), network)
    }

    /// Create a SegWit address from a version 0 witness program.
    ///
    /// # Returns
    /// A P2WPKH (20-byte program) or P2WSH (32-byte program) address, or
    /// `AddressError::UnsupportedAddress` for other versions.
    pub fn from_witness_program(
        version: u8,
        program: &[u8],
        network: Network,
    ) -> Result<Self, AddressError> {
        let kind = witness_kind(version, program.len())?;
        let address_string = bech32::segwit_encode(network.bech32_hrp(), version, program)?;
        Ok(Address {
            address_string,
            network,
            kind,
            payload: program.to_vec(),
        })
    }

    /// Parse an address string of any supported kind.
    ///
    /// Strings starting with a known human-readable part and separator
    /// (`bc1`, `tb1`, either case) are decoded as Bech32, everything else
    /// as Base58Check.
    ///
    /// # Returns
    /// The parsed `Address`, or an error naming why it was rejected.
    pub fn from_string(addr: &str) -> Result<Self, AddressError> {
        let lower = addr.to_ascii_lowercase();
        let is_bech32 = Network::ALL
            .iter()
            .any(|n| lower.starts_with(&format!("{}1", n.bech32_hrp())));
        let parsed = if is_bech32 {
            Self::from_bech32(addr)?
        } else {
            Self::from_base58(addr)?
        };
        tracing::trace!(kind = ?parsed.kind, network = %parsed.network, "classified address");
        Ok(parsed)
    }

    /// Whether `addr` parses as a supported address.
    pub fn is_valid(addr: &str) -> bool {
        Self::from_string(addr).is_ok()
    }

    /// Whether this is a P2PKH address.
    pub fn is_p2pkh(&self) -> bool {
        self.kind == AddressKind::P2pkh
    }

    /// Whether this is a P2SH (including nested SegWit) address.
    pub fn is_p2sh(&self) -> bool {
        self.kind == AddressKind::P2sh
    }

    /// Whether this is a native P2WPKH address.
    pub fn is_p2wpkh(&self) -> bool {
        self.kind == AddressKind::P2wpkh
    }

    /// Whether this is a native P2WSH address.
    pub fn is_p2wsh(&self) -> bool {
        self.kind == AddressKind::P2wsh
    }

    fn base58(kind: AddressKind, version: u8, hash: &[u8; 20], network: Network) -> Self {
        Address {
            address_string: base58::check_encode(version, hash),
            network,
            kind,
            payload: hash.to_vec(),
        }
    }

    fn from_base58(addr: &str) -> Result<Self, AddressError> {
        let (version, payload) = base58::check_decode(addr)?;
        if payload.len() != HASH160_LEN {
            return Err(AddressError::InvalidPayloadLength(payload.len()));
        }

        let (network, kind) = if let Some(n) = Network::from_p2pkh_prefix(version) {
            (n, AddressKind::P2pkh)
        } else if let Some(n) = Network::from_p2sh_prefix(version) {
            (n, AddressKind::P2sh)
        } else {
            tracing::debug!(version, "rejected base58 address with unknown version");
            return Err(AddressError::UnsupportedAddress(format!(
                "version byte 0x{:02x}",
                version
            )));
        };

        Ok(Address {
            address_string: addr.to_string(),
            network,
            kind,
            payload,
        })
    }

    fn from_bech32(addr: &str) -> Result<Self, AddressError> {
        let wp = bech32::segwit_decode(addr)?;
        let network = Network::from_hrp(&wp.hrp).ok_or_else(|| {
            AddressError::UnsupportedAddress(format!("human-readable part '{}'", wp.hrp))
        })?;
        let kind = witness_kind(wp.version, wp.program.len())?;
        Ok(Address {
            address_string: addr.to_ascii_lowercase(),
            network,
            kind,
            payload: wp.program,
        })
    }
}

fn witness_kind(version: u8, len: usize) -> Result<AddressKind, AddressError> {
    match (version, len) {
        (WITNESS_V0, HASH160_LEN) => Ok(AddressKind::P2wpkh),
        (WITNESS_V0, SHA256_LEN) => Ok(AddressKind::P2wsh),
        (WITNESS_V0, other) => Err(AddressError::InvalidPayloadLength(other)),
        (v, _) => Err(AddressError::UnsupportedAddress(format!(
            "witness version {}",
            v
        ))),
    }
}

impl fmt::Display for Address {
    /// Display the address as its encoded string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}
