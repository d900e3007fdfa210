/// Error types for address and WIF handling.
///
/// Covers network resolution, address parsing and construction, and
/// failures bubbled up from the primitives codecs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Network name not recognized.
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    /// Decoded payload is not the 20 bytes a P2PKH/P2SH address carries.
    #[error("invalid address payload length {0}")]
    InvalidPayloadLength(usize),

    /// Version byte, human-readable part or witness version is not one we handle.
    #[error("address not supported: {0}")]
    UnsupportedAddress(String),

    /// WIF prefix byte does not belong to a known network.
    #[error("unknown WIF prefix 0x{0:02x}")]
    UnknownWifPrefix(u8),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] keyforge_primitives::PrimitivesError),
}
