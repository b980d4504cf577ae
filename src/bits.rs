//! Bit-stream codec.
//!
//! Converts text to a big-endian bit sequence (8 bits per character, most
//! significant bit first) and back. Only single-byte code points (0-255) are
//! representable; they map to characters one-to-one (Latin-1).

use std::fmt;
use std::ops::Range;

use crate::stego::StegoError;

/// Number of bits used per character.
pub const BITS_PER_CHAR: usize = 8;

/// An ordered sequence of bits, read as a big-endian base-2 number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Creates an empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bit string with room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Parses a string of `0`/`1` characters. Any other character yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        text.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(|bits| Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends `value` as a `width`-bit big-endian field.
    ///
    /// Bits of `value` above `width` are ignored.
    pub fn push_uint(&mut self, value: u64, width: usize) {
        debug_assert!(width <= 64);
        for shift in (0..width).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    pub fn extend_from_bits(&mut self, bits: &[bool]) {
        self.bits.extend_from_slice(bits);
    }

    pub fn truncate(&mut self, len: usize) {
        self.bits.truncate(len);
    }

    /// Reads the bits in `range` as an unsigned big-endian integer.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    pub fn read_uint(&self, range: Range<usize>) -> u64 {
        bits_to_uint(&self.bits[range])
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Interprets `bits` as an unsigned big-endian integer.
pub fn bits_to_uint(bits: &[bool]) -> u64 {
    bits.iter().fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// Encodes text as 8 bits per character, most significant bit first.
///
/// # Errors
/// Returns [`StegoError::UnsupportedCharacter`] for any character whose code
/// point exceeds 255.
pub fn encode_text(text: &str) -> Result<BitString, StegoError> {
    let mut bits = BitString::with_capacity(text.len() * BITS_PER_CHAR);
    for (position, character) in text.chars().enumerate() {
        let byte = u8::try_from(u32::from(character))
            .map_err(|_| StegoError::UnsupportedCharacter { character, position })?;
        bits.push_uint(u64::from(byte), BITS_PER_CHAR);
    }
    Ok(bits)
}

/// Decodes every complete 8-bit group into a character.
///
/// A trailing group shorter than 8 bits is discarded.
pub fn decode_text(bits: &[bool]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(|group| char::from(bits_to_uint(group) as u8))
        .collect()
}

/// Like [`decode_text`], but a trailing group shorter than 8 bits is kept as
/// the character of its own value (`"1"` is U+0001).
pub fn decode_text_with_remainder(bits: &[bool]) -> String {
    bits.chunks(BITS_PER_CHAR)
        .map(|group| char::from(bits_to_uint(group) as u8))
        .collect()
}

/// Like [`decode_text`], but stops at the first all-zero group.
pub fn decode_until_terminator(bits: &[bool]) -> String {
    bits.chunks_exact(BITS_PER_CHAR)
        .map(|group| bits_to_uint(group) as u8)
        .take_while(|&byte| byte != 0)
        .map(char::from)
        .collect()
}

/// Reads bytes as Latin-1: each byte becomes the character with that code
/// point. Never fails.
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Inverse of [`latin1_decode`].
pub fn latin1_encode(text: &str) -> Result<Vec<u8>, StegoError> {
    text.chars()
        .enumerate()
        .map(|(position, character)| {
            u8::try_from(character)
                .map_err(|_| StegoError::UnsupportedCharacter { character, position })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_bytes() {
        let bytes = [b'c', b'a', b'f', 0xE9, 0x00, 0xFF];
        let text = latin1_decode(&bytes);
        assert_eq!(text, "caf\u{e9}\0\u{ff}");
        assert_eq!(latin1_encode(&text).unwrap(), bytes);

        assert!(matches!(
            latin1_encode("ok \u{20ac}"),
            Err(StegoError::UnsupportedCharacter { character: '\u{20ac}', position: 3 })
        ));
    }

    #[test]
    fn test_decode_keeps_remainder() {
        let bits = BitString::parse("0100100001101").unwrap();
        assert_eq!(decode_text(bits.as_slice()), "H");
        assert_eq!(decode_text_with_remainder(bits.as_slice()), "H\u{d}");
        assert_eq!(decode_text_with_remainder(&[]), "");
    }

    #[test]
    fn test_encode_hi() {
        let bits = encode_text("Hi").unwrap();
        assert_eq!(bits.to_string(), "0100100001101001");
    }

    #[test]
    fn test_encode_rejects_wide_characters() {
        let err = encode_text("ab€").unwrap_err();
        assert!(matches!(
            err,
            StegoError::UnsupportedCharacter {
                character: '€',
                position: 2
            }
        ));
    }

    #[test]
    fn test_latin1_characters_survive() {
        let text = "café ÿ\u{00}x";
        let bits = encode_text(text).unwrap();
        assert_eq!(bits.len(), text.chars().count() * 8);
        assert_eq!(decode_text(bits.as_slice()), text);
    }

    #[test]
    fn test_decode_drops_partial_group() {
        let bits = BitString::parse("01000001101").unwrap();
        assert_eq!(decode_text(bits.as_slice()), "A");
    }

    #[test]
    fn test_decode_until_terminator() {
        let bits = BitString::parse("010000010000000001000010").unwrap();
        assert_eq!(decode_until_terminator(bits.as_slice()), "A");
        assert_eq!(decode_text(bits.as_slice()), "A\u{0}B");
    }

    #[test]
    fn test_push_and_read_uint() {
        let mut bits = BitString::new();
        bits.push_uint(16, 32);
        bits.push_uint(0b101, 3);
        assert_eq!(bits.len(), 35);
        assert_eq!(bits.read_uint(0..32), 16);
        assert_eq!(bits.read_uint(32..35), 5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(BitString::parse("01a").is_none());
        assert_eq!(BitString::parse("").unwrap(), BitString::new());
    }
}
