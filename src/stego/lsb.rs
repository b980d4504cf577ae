//! Fixed-rate least-significant-bit substitution.
//!
//! Shared by the image and audio codecs. The payload is the 8-bit encoding of
//! the text followed by a null-byte terminator, one bit per sample:
//!
//! ```text
//! sample[i] = (sample[i] & !1) | bit[i]
//! ```

use log::debug;

use super::{Scheme, StegoError};
use crate::bits::{decode_until_terminator, encode_text, BITS_PER_CHAR};

/// Bits added after the message to mark its end.
pub const TERMINATOR_BITS: usize = BITS_PER_CHAR;

/// Embeds `text` into the low bits of `samples`.
///
/// Fails before touching `samples` if the message plus terminator does not fit.
pub(crate) fn embed(samples: &mut [u8], text: &str, scheme: Scheme) -> Result<(), StegoError> {
    let mut bits = encode_text(text)?;
    bits.push_uint(0, TERMINATOR_BITS);

    if bits.len() > samples.len() {
        return Err(StegoError::CapacityExceeded {
            scheme,
            needed: bits.len(),
            available: samples.len(),
        });
    }

    for (sample, &bit) in samples.iter_mut().zip(bits.as_slice()) {
        *sample = (*sample & !1) | u8::from(bit);
    }

    debug!(
        "{scheme}: embedded {} bits into {} samples",
        bits.len(),
        samples.len()
    );
    Ok(())
}

/// Reads low bits until the first null byte or the end of `samples`.
pub(crate) fn extract(samples: &[u8], scheme: Scheme) -> String {
    let bits: Vec<bool> = samples.iter().map(|sample| sample & 1 == 1).collect();
    let text = decode_until_terminator(&bits);
    debug!("{scheme}: recovered {} characters", text.chars().count());
    text
}

/// Number of characters that fit in `sample_count` samples.
pub(crate) fn max_message_chars(sample_count: usize) -> usize {
    sample_count.saturating_sub(TERMINATOR_BITS) / BITS_PER_CHAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_sets_low_bits_only() {
        let mut samples = vec![0b1010_1011u8; 24];
        embed(&mut samples, "A", Scheme::LsbAudio).unwrap();

        // 'A' = 01000001, then the terminator
        let low: Vec<u8> = samples.iter().map(|s| s & 1).collect();
        assert_eq!(&low[..8], &[0, 1, 0, 0, 0, 0, 0, 1]);
        assert!(low[8..16].iter().all(|&b| b == 0));
        // untouched tail keeps its original value
        assert!(samples[16..].iter().all(|&s| s == 0b1010_1011));
        assert!(samples.iter().all(|s| s & !1 == 0b1010_1010));
    }

    #[test]
    fn test_exact_fit() {
        let mut samples = vec![7u8; 16];
        embed(&mut samples, "z", Scheme::LsbImage).unwrap();
        assert_eq!(extract(&samples, Scheme::LsbImage), "z");
    }

    #[test]
    fn test_rejects_without_mutation() {
        let mut samples = vec![201u8; 15];
        let err = embed(&mut samples, "z", Scheme::LsbImage).unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                needed: 16,
                available: 15,
                ..
            }
        ));
        assert!(samples.iter().all(|&s| s == 201));
    }

    #[test]
    fn test_extract_without_terminator() {
        // every low bit set: 0xFF bytes, no terminator anywhere
        let samples = vec![1u8; 17];
        let text = extract(&samples, Scheme::LsbImage);
        assert_eq!(text, "\u{ff}\u{ff}");
    }

    #[test]
    fn test_max_message_chars() {
        assert_eq!(max_message_chars(0), 0);
        assert_eq!(max_message_chars(16), 1);
        assert_eq!(max_message_chars(23), 1);
        assert_eq!(max_message_chars(24), 2);
    }
}
