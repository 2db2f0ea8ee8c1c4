//! BIP39 mnemonic phrases over the English word list.
//!
//! A phrase encodes `ENT` bits of entropy followed by `ENT / 32` checksum bits
//! (the leading bits of `SHA-256(entropy)`), cut into 11-bit word indices.

use crate::{
    constants::{BITS_PER_WORD, ENTROPY_BITS},
    error::{Error, Result},
};
use bip39::Language;
use crypto_utils::hash::sha256;
use rand::{CryptoRng, RngCore, rngs::OsRng};
use tracing::debug;
use zeroize::Zeroizing;

/// Generate a phrase from `entropy_bits` of operating-system randomness.
pub fn generate(entropy_bits: usize) -> Result<String> {
    generate_with_rng(&mut OsRng, entropy_bits)
}

/// Generate a phrase drawing entropy from `rng`.
///
/// A failing randomness source is reported as [`Error::EntropySource`] and
/// never retried.
pub fn generate_with_rng<R>(rng: &mut R, entropy_bits: usize) -> Result<String>
where
    R: RngCore + CryptoRng,
{
    check_entropy_bits(entropy_bits)?;
    let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
    rng.try_fill_bytes(&mut entropy)
        .map_err(|e| Error::EntropySource(e.to_string()))?;
    let phrase = from_entropy(&entropy)?;
    debug!(
        entropy_bits,
        words = word_count(entropy_bits),
        "generated mnemonic"
    );
    Ok(phrase)
}

/// Encode raw entropy as a phrase.
pub fn from_entropy(entropy: &[u8]) -> Result<String> {
    let entropy_bits = entropy.len() * 8;
    check_entropy_bits(entropy_bits)?;

    // checksum is at most 8 bits, so the first digest byte covers it
    let digest = sha256(entropy);
    let mut bits = Zeroizing::new(entropy.to_vec());
    bits.push(digest[0]);

    let words = Language::English.word_list();
    let phrase = (0..word_count(entropy_bits))
        .map(|w| words[read_index(&bits, w * BITS_PER_WORD) as usize])
        .collect::<Vec<_>>()
        .join(" ");
    Ok(phrase)
}

/// Recover the entropy a phrase encodes, checking its words and checksum.
pub fn to_entropy(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let total_bits = words.len() * BITS_PER_WORD;
    let entropy_bits = total_bits * 32 / 33;
    if !ENTROPY_BITS.contains(&entropy_bits) || total_bits % 33 != 0 {
        return Err(Error::InvalidWordCount(words.len()));
    }

    let mut bits = Zeroizing::new(vec![0u8; total_bits.div_ceil(8)]);
    for (position, word) in words.iter().enumerate() {
        let index = Language::English
            .find_word(word)
            .ok_or(Error::UnknownWord(position))?;
        write_index(&mut bits, position * BITS_PER_WORD, index);
    }

    let entropy = Zeroizing::new(bits[..entropy_bits / 8].to_vec());
    let checksum_bits = entropy_bits / 32;
    let mask = 0xffu8 << (8 - checksum_bits);
    if sha256(&entropy)[0] & mask != bits[entropy_bits / 8] & mask {
        return Err(Error::InvalidMnemonicChecksum);
    }
    Ok(entropy)
}

/// Whether `phrase` is a well-formed English BIP39 mnemonic.
pub fn validate(phrase: &str) -> bool {
    to_entropy(phrase).is_ok()
}

fn check_entropy_bits(entropy_bits: usize) -> Result<()> {
    if ENTROPY_BITS.contains(&entropy_bits) {
        Ok(())
    } else {
        Err(Error::InvalidEntropySize(entropy_bits))
    }
}

fn word_count(entropy_bits: usize) -> usize {
    (entropy_bits + entropy_bits / 32) / BITS_PER_WORD
}

/// Read 11 bits, most significant first, starting at bit `offset`.
fn read_index(bytes: &[u8], offset: usize) -> u16 {
    (offset..offset + BITS_PER_WORD).fold(0u16, |acc, pos| {
        let bit = (bytes[pos / 8] >> (7 - pos % 8)) & 1;
        (acc << 1) | bit as u16
    })
}

fn write_index(bytes: &mut [u8], offset: usize, index: u16) {
    for i in 0..BITS_PER_WORD {
        if index & (1 << (BITS_PER_WORD - 1 - i)) != 0 {
            let pos = offset + i;
            bytes[pos / 8] |= 0x80 >> (pos % 8);
        }
    }
}
