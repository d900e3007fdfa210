//! Base58 and Base58Check encoding.
//!
//! Raw Base58 treats the input as one big-endian number written in
//! Bitcoin's 58-character alphabet, with each leading zero byte kept as a
//! leading `'1'`. Base58Check prepends a version byte and appends the first
//! four bytes of SHA-256d as a checksum; it is the text form of WIF keys and
//! legacy addresses.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Number of checksum bytes appended by Base58Check.
const CHECKSUM_LEN: usize = 4;

/// Encode a byte slice to a Base58 string.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A Base58-encoded string; leading zero bytes become leading '1's.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or `PrimitivesError::InvalidBase58` for a
/// character outside the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Encode `version ‖ payload` with a 4-byte double-SHA-256 checksum appended.
///
/// # Arguments
/// * `version` - Version byte (address type or WIF network prefix).
/// * `payload` - The bytes to encode.
///
/// # Returns
/// A Base58Check-encoded string.
pub fn check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&data)
}

/// Decode a Base58Check string, verifying the 4-byte checksum.
///
/// # Arguments
/// * `s` - The Base58Check string to decode.
///
/// # Returns
/// `Ok((version, payload))` on success, `PrimitivesError::InvalidBase58` for
/// bad characters or input too short to hold a version and checksum, or
/// `PrimitivesError::ChecksumMismatch` when the checksum does not match.
pub fn check_decode(s: &str) -> Result<(u8, Vec<u8>), PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < 1 + CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for version and checksum".to_string(),
        ));
    }
    let (data, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let expected = sha256d(data);
    if checksum != &expected[..CHECKSUM_LEN] {
        tracing::debug!("base58check checksum mismatch");
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok((data[0], data[1..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_empty_string() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_base58_single_zero_byte() {
        assert_eq!(encode(&[0]), "1");
        assert_eq!(decode("1").unwrap(), vec![0]);
    }

    #[test]
    fn test_base58_decoded_address() {
        let input = hex::decode("00010966776006953D5567439E5E39F86A0D273BEED61967F6").unwrap();
        assert_eq!(encode(&input), "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM");
        assert_eq!(decode("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").unwrap(), input);
    }

    #[test]
    fn test_base58_decoded_hash() {
        let input = hex::decode("0123456789ABCDEF").unwrap();
        assert_eq!(encode(&input), "C3CPq7c8PY");
        assert_eq!(decode("C3CPq7c8PY").unwrap(), input);
    }

    #[test]
    fn test_base58_leading_zeros() {
        let input = hex::decode("000000287FB4CD").unwrap();
        assert_eq!(encode(&input), "111233QC4");
        assert_eq!(decode("111233QC4").unwrap(), input);
    }

    #[test]
    fn test_base58_decode_invalid_character() {
        assert!(matches!(
            decode("invalid!@#$%"),
            Err(PrimitivesError::InvalidBase58(_))
        ));
        assert!(decode("1234!@#$%").is_err());
        // 0, O, I and l are excluded.
        for bad in ["0", "O", "I", "l", "é"] {
            assert!(decode(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_base58_encode_edge_cases() {
        assert_eq!(encode(&[0, 0, 0, 0]), "1111");
        assert_eq!(encode(&[255, 255, 255, 255]), "7YXq9G");
        assert_eq!(encode(&[57]), "z");
        assert_eq!(encode(&[58]), "21");
    }

    #[test]
    fn test_base58_check_roundtrip() {
        let payload = hex::decode("f54a5851e9372b87810a8e60cdd2e7cfd80b6e31").unwrap();
        let encoded = check_encode(0x00, &payload);
        assert_eq!(encoded, "1PMycacnJaSqwwJqjawXBErnLsZ7RkXUAs");
        let (version, decoded) = check_decode(&encoded).unwrap();
        assert_eq!(version, 0x00);
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_base58_check_bad_checksum() {
        let mut encoded = check_encode(0x80, &[0x01, 0x02, 0x03]);
        let last = encoded.pop().unwrap();
        let replacement = if last == '1' { '2' } else { '1' };
        encoded.push(replacement);
        assert_eq!(check_decode(&encoded), Err(PrimitivesError::ChecksumMismatch));
    }

    #[test]
    fn test_base58_check_too_short() {
        // "1111" decodes to four zero bytes, no room for a version byte.
        assert!(matches!(
            check_decode("1111"),
            Err(PrimitivesError::InvalidBase58(_))
        ));
    }
}
