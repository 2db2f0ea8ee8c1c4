use crate::hash::sha256d;
use thiserror::Error;

/// Bitcoin Base58 alphabet (no `0`, `O`, `I`, `l`).
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {0:?}")]
    InvalidCharacter(char),
    #[error("base58 payload too short")]
    InvalidLength,
    #[error("base58check checksum mismatch")]
    InvalidChecksum,
}

/// Reverse lookup table from ASCII to digit value.
const fn decode_table() -> [u8; 128] {
    let mut table = [0xff; 128];
    let mut i = 0;
    while i < BASE58_ALPHABET.len() {
        table[BASE58_ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const DECODE_TABLE: [u8; 128] = decode_table();

pub fn base58_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // little-endian base-58 digits of the big-endian input
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat_n('1', zeros));
    out.extend(
        digits
            .iter()
            .rev()
            .map(|&d| BASE58_ALPHABET[d as usize] as char),
    );
    out
}

pub fn base58_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    if s.is_empty() {
        return Err(Base58Error::InvalidLength);
    }
    let zeros = s.bytes().take_while(|&b| b == b'1').count();

    // little-endian base-256 bytes
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len() * 733 / 1000 + 1);
    for c in s.chars().skip(zeros) {
        let value = match c {
            c if c.is_ascii() && DECODE_TABLE[c as usize] != 0xff => DECODE_TABLE[c as usize],
            c => return Err(Base58Error::InvalidCharacter(c)),
        };
        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += *byte as u32 * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Encode `payload ‖ sha256d(payload)[..4]`.
pub fn base58_check_encode(payload: &[u8]) -> String {
    let mut extended = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    extended.extend_from_slice(payload);
    extended.extend_from_slice(&checksum(payload));
    base58_encode(&extended)
}

/// Decode a Base58Check string and return the payload without its checksum.
pub fn base58_check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let mut raw = base58_decode(s)?;
    if raw.len() < CHECKSUM_LEN {
        return Err(Base58Error::InvalidLength);
    }
    let expected = raw.split_off(raw.len() - CHECKSUM_LEN);
    if checksum(&raw)[..] != expected[..] {
        return Err(Base58Error::InvalidChecksum);
    }
    Ok(raw)
}

/// Leading four bytes of the double SHA-256 of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256d(payload);
    [digest[0], digest[1], digest[2], digest[3]]
}
