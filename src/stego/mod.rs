//! Steganography module for hiding text in carriers.
//!
//! Supports:
//! - Image LSB steganography (PNG, BMP, ...)
//! - Image PVD (pixel-value differencing) steganography
//! - Audio LSB steganography (WAV)

pub mod audio;
pub mod capacity;
pub mod error;
pub mod image;
mod lsb;
pub mod pvd;

pub use audio::{LsbAudioCodec, PcmBuffer, PcmFormat};
pub use capacity::{capacity, range_lower_bound};
pub use error::{Scheme, StegoError};
pub use image::{LsbImageCodec, PixelGrid};
pub use lsb::TERMINATOR_BITS;
pub use pvd::{FrameReader, FrameState, PvdImageCodec, PvdVariant, LENGTH_PREFIX_BITS};

/// Common surface of every embedding scheme.
///
/// Codecs are stateless; the carrier is owned by the caller, mutated in place
/// by [`embed`](StegoCodec::embed) and only read by
/// [`extract`](StegoCodec::extract).
pub trait StegoCodec {
    /// In-memory carrier the codec works on.
    type Carrier;

    /// Identifies the codec in errors and logs.
    fn scheme(&self) -> Scheme;

    /// Raw number of bits the carrier can hold, framing included.
    fn capacity_bits(&self, carrier: &Self::Carrier) -> usize;

    /// Number of characters that fit once framing overhead is subtracted.
    fn max_message_chars(&self, carrier: &Self::Carrier) -> usize;

    /// Hides `text` in the carrier.
    ///
    /// Fails without modifying the carrier when the text contains a character
    /// above U+00FF or does not fit. Legacy PVD skips the fit check and
    /// truncates instead.
    fn embed(&self, carrier: &mut Self::Carrier, text: &str) -> Result<(), StegoError>;

    /// Recovers hidden text. Never fails: a carrier without a payload yields
    /// an empty or partial string.
    fn extract(&self, carrier: &Self::Carrier) -> String;
}
