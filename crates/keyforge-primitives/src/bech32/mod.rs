//! Bech32 (BIP-173) encoding and SegWit witness programs.
//!
//! A Bech32 string is `hrp ‖ '1' ‖ data ‖ checksum`, where data and the
//! six-character checksum are 5-bit groups written in a 32-character
//! alphabet. The checksum is a BCH code computed by [`polymod`] over the
//! expanded human-readable part and the data.
//!
//! Only the original BIP-173 constant is implemented; Bech32m (BIP-350) is
//! not.

use crate::PrimitivesError;

/// The 32-character data alphabet, indexed by 5-bit value.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// BCH generator coefficients.
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Separator between the human-readable part and the data.
const SEPARATOR: char = '1';

/// Checksum length in 5-bit groups.
const CHECKSUM_LEN: usize = 6;

/// Maximum total string length.
pub const MAX_LEN: usize = 90;

/// Highest witness version.
const MAX_WITNESS_VERSION: u8 = 16;

/// A decoded SegWit witness program.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WitnessProgram {
    /// Human-readable part, lowercase.
    pub hrp: String,
    /// Witness version, 0 to 16.
    pub version: u8,
    /// Program bytes, 2 to 40 of them.
    pub program: Vec<u8>,
}

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

/// High bits of each character, a zero, then the low bits.
fn expand_hrp(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn check_hrp(hrp: &str) -> Result<(), PrimitivesError> {
    if hrp.is_empty() {
        return Err(PrimitivesError::InvalidHumanPart("empty".to_string()));
    }
    if hrp.len() > MAX_LEN - 1 - CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidHumanPart(format!(
            "{} characters is too long",
            hrp.len()
        )));
    }
    if let Some(c) = hrp.chars().find(|c| !('!'..='~').contains(c)) {
        return Err(PrimitivesError::InvalidHumanPart(format!(
            "character {:?} outside US-ASCII 33..126",
            c
        )));
    }
    if let Some(c) = hrp.chars().find(|c| c.is_ascii_uppercase()) {
        return Err(PrimitivesError::InvalidHumanPart(format!(
            "uppercase character {:?}",
            c
        )));
    }
    Ok(())
}

/// Encode 5-bit `data` under the human-readable part `hrp`.
///
/// # Arguments
/// * `hrp` - Human-readable part, 1 to 83 lowercase printable US-ASCII characters.
/// * `data` - Values in `0..32`.
///
/// # Returns
/// The lowercase Bech32 string, `PrimitivesError::OutputTooLong` if it would
/// exceed 90 characters, or `PrimitivesError::InvalidHumanPart` /
/// `PrimitivesError::InvalidBech32` for bad input.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String, PrimitivesError> {
    check_hrp(hrp)?;
    if data.iter().any(|&d| d >> 5 != 0) {
        return Err(PrimitivesError::InvalidBech32(
            "data value exceeds 5 bits".to_string(),
        ));
    }
    let total = hrp.len() + 1 + data.len() + CHECKSUM_LEN;
    if total > MAX_LEN {
        return Err(PrimitivesError::OutputTooLong(total));
    }

    let mut values = expand_hrp(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let pm = polymod(&values) ^ 1;

    let mut out = String::with_capacity(total);
    out.push_str(hrp);
    out.push(SEPARATOR);
    out.extend(data.iter().map(|&d| CHARSET[d as usize] as char));
    for i in 0..CHECKSUM_LEN {
        out.push(CHARSET[((pm >> (5 * (5 - i))) & 0x1f) as usize] as char);
    }
    Ok(out)
}

/// Decode a Bech32 string into its human-readable part and 5-bit data.
///
/// Upper- or lowercase input is accepted, mixed case is not. The separator
/// is the last `'1'` in the string.
///
/// # Returns
/// `Ok((hrp, data))` with the hrp in lowercase and the checksum removed, or
/// `PrimitivesError::MixedCase`, `PrimitivesError::InvalidCharacter`,
/// `PrimitivesError::InvalidHumanPart`, `PrimitivesError::ChecksumMismatch`
/// or `PrimitivesError::InvalidBech32` for the other structural failures.
pub fn decode(s: &str) -> Result<(String, Vec<u8>), PrimitivesError> {
    if s.len() > MAX_LEN {
        return Err(PrimitivesError::InvalidBech32(format!(
            "length {} exceeds {}",
            s.len(),
            MAX_LEN
        )));
    }
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(PrimitivesError::MixedCase);
    }
    let s = s.to_ascii_lowercase();

    let pos = s
        .rfind(SEPARATOR)
        .ok_or_else(|| PrimitivesError::InvalidBech32("missing separator".to_string()))?;
    let (hrp, rest) = s.split_at(pos);
    check_hrp(hrp)?;

    let data_part = &rest[1..];
    if data_part.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBech32(
            "data part shorter than checksum".to_string(),
        ));
    }

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let v = CHARSET
            .iter()
            .position(|&x| c.is_ascii() && x == c as u8)
            .ok_or(PrimitivesError::InvalidCharacter(c))?;
        data.push(v as u8);
    }

    let mut values = expand_hrp(hrp);
    values.extend_from_slice(&data);
    if polymod(&values) != 1 {
        tracing::debug!(hrp, "bech32 checksum mismatch");
        return Err(PrimitivesError::ChecksumMismatch);
    }

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_string(), data))
}

/// Regroup a bit stream from `from`-bit values into `to`-bit values.
///
/// # Arguments
/// * `data` - Input values, each below `2^from`.
/// * `from`, `to` - Group widths, 1 to 8.
/// * `pad` - Zero-pad a trailing partial group. When false, leftover bits
///   must be fewer than `from` and all zero.
///
/// # Returns
/// The regrouped values, `PrimitivesError::InvalidPadding` for too many
/// leftover bits, `PrimitivesError::NonZeroPadding` for set leftover bits,
/// or `PrimitivesError::InvalidBech32` for an input value that is too wide.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, PrimitivesError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_v: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let v = u32::from(value);
        if v >> from != 0 {
            return Err(PrimitivesError::InvalidBech32(format!(
                "value {} exceeds {} bits",
                v, from
            )));
        }
        acc = ((acc << from) | v) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_v) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_v) as u8);
        }
    } else if bits >= from {
        return Err(PrimitivesError::InvalidPadding(format!(
            "{} leftover bits",
            bits
        )));
    } else if (acc << (to - bits)) & max_v != 0 {
        return Err(PrimitivesError::NonZeroPadding);
    }
    Ok(out)
}

/// Encode a witness program as a SegWit address.
///
/// # Returns
/// The Bech32 string, `PrimitivesError::InvalidWitnessVersion` for a
/// version above 16, or `PrimitivesError::InvalidProgramLength` for a
/// program outside 2..=40 bytes. Version 0 length rules for P2WPKH / P2WSH
/// belong to the address layer.
pub fn segwit_encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, PrimitivesError> {
    check_witness(version, program)?;
    let mut data = Vec::with_capacity(1 + (program.len() * 8 + 4) / 5);
    data.push(version);
    data.extend(convert_bits(program, 8, 5, true)?);
    encode(hrp, &data)
}

/// Decode a SegWit address into its witness program.
pub fn segwit_decode(s: &str) -> Result<WitnessProgram, PrimitivesError> {
    let (hrp, data) = decode(s)?;
    let (&version, rest) = data
        .split_first()
        .ok_or_else(|| PrimitivesError::InvalidBech32("missing witness version".to_string()))?;
    if version > MAX_WITNESS_VERSION {
        return Err(PrimitivesError::InvalidWitnessVersion(version));
    }
    let program = convert_bits(rest, 5, 8, false)?;
    check_witness(version, &program)?;
    Ok(WitnessProgram {
        hrp,
        version,
        program,
    })
}

fn check_witness(version: u8, program: &[u8]) -> Result<(), PrimitivesError> {
    if version > MAX_WITNESS_VERSION {
        return Err(PrimitivesError::InvalidWitnessVersion(version));
    }
    if program.len() < 2 || program.len() > 40 {
        return Err(PrimitivesError::InvalidProgramLength(program.len()));
    }
    Ok(())
}
