/// Unified error type for all primitives operations.
///
/// Covers modular arithmetic, curve operations, key and signature
/// encoding, and the Base58Check / Bech32 text codecs. Every variant is a
/// local, recoverable condition reported to the immediate caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    #[error("value has no modular inverse")]
    NoInverse,

    #[error("invalid curve parameters: {0}")]
    InvalidCurve(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("point at infinity has no affine encoding")]
    PointAtInfinity,

    #[error("invalid signature: {0}")]
    InvalidSignatureFormat(String),

    #[error("malformed DER signature: {0}")]
    MalformedDer(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("non-zero padding")]
    NonZeroPadding,

    #[error("invalid padding: {0}")]
    InvalidPadding(String),

    #[error("output too long: {0} characters")]
    OutputTooLong(usize),

    #[error("invalid bech32: {0}")]
    InvalidBech32(String),

    #[error("string has mixed case")]
    MixedCase,

    #[error("invalid human-readable part: {0}")]
    InvalidHumanPart(String),

    #[error("invalid witness version {0}")]
    InvalidWitnessVersion(u8),

    #[error("invalid witness program length {0}")]
    InvalidProgramLength(usize),

    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
