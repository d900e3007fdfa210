//! Wallet Import Format keys bound to a network.

use std::fmt;

use keyforge_primitives::ec::PrivateKey;

use crate::{AddressError, Network};

/// A private key decoded from (or destined for) a WIF string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WifKey {
    /// The private key.
    pub key: PrivateKey,
    /// The network named by the WIF version byte.
    pub network: Network,
    /// Whether the key is flagged for a compressed public key.
    pub compressed: bool,
}

impl WifKey {
    /// Bind `key` to `network` with the given compression flag.
    pub fn new(key: PrivateKey, network: Network, compressed: bool) -> Self {
        WifKey {
            key,
            network,
            compressed,
        }
    }

    /// Encode as a WIF string.
    pub fn encode(&self) -> String {
        encode(&self.key, self.network, self.compressed)
    }
}

impl fmt::Display for WifKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Encode `key` as WIF for `network`.
pub fn encode(key: &PrivateKey, network: Network, compressed: bool) -> String {
    key.to_wif(network.wif_prefix(), compressed)
}

/// Decode a WIF string and resolve its network.
///
/// # Returns
/// The key with its network and compression flag, `AddressError::UnknownWifPrefix`
/// for a version byte no network uses, or the underlying Base58Check/WIF error.
pub fn decode(s: &str) -> Result<WifKey, AddressError> {
    let decoded = PrivateKey::from_wif(s)?;
    let network = Network::from_wif_prefix(decoded.prefix)
        .ok_or(AddressError::UnknownWifPrefix(decoded.prefix))?;
    Ok(WifKey {
        key: decoded.key,
        network,
        compressed: decoded.compressed,
    })
}
