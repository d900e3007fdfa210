//! Supported Bitcoin networks.
//!
//! Each network carries its own address version bytes, WIF prefix and
//! Bech32 human-readable part. Callers resolve a name to a [`Network`] once
//! (via `FromStr` or serde) and pass the value around from then on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AddressError;

/// Bitcoin network type for prefix selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet (P2PKH addresses start with '1', SegWit with "bc1").
    Mainnet,
    /// Bitcoin testnet (P2PKH addresses start with 'm' or 'n', SegWit with "tb1").
    Testnet,
}

impl Network {
    /// Every supported network.
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    /// Version byte of P2PKH addresses.
    pub fn p2pkh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    /// Version byte of P2SH addresses.
    pub fn p2sh_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            Network::Testnet => 0xc4,
        }
    }

    /// Version byte of WIF private keys.
    pub fn wif_prefix(self) -> u8 {
        match self {
            Network::Mainnet => 0x80,
            Network::Testnet => 0xef,
        }
    }

    /// Bech32 human-readable part of SegWit addresses.
    pub fn bech32_hrp(self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet => "tb",
        }
    }

    /// The network whose P2PKH version byte is `prefix`.
    pub fn from_p2pkh_prefix(prefix: u8) -> Option<Network> {
        Self::ALL.into_iter().find(|n| n.p2pkh_prefix() == prefix)
    }

    /// The network whose P2SH version byte is `prefix`.
    pub fn from_p2sh_prefix(prefix: u8) -> Option<Network> {
        Self::ALL.into_iter().find(|n| n.p2sh_prefix() == prefix)
    }

    /// The network whose WIF version byte is `prefix`.
    pub fn from_wif_prefix(prefix: u8) -> Option<Network> {
        Self::ALL.into_iter().find(|n| n.wif_prefix() == prefix)
    }

    /// The network whose Bech32 human-readable part is `hrp` (lowercase).
    pub fn from_hrp(hrp: &str) -> Option<Network> {
        Self::ALL.into_iter().find(|n| n.bech32_hrp() == hrp)
    }
}

impl FromStr for Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Mainnet),
            "test" | "testnet" => Ok(Network::Testnet),
            _ => Err(AddressError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}
