//! # steganote - hide text in images and audio
//!
//! A steganographic codec that embeds a text payload into a carrier image or
//! WAV file and recovers it losslessly.
//!
//! ## Schemes
//!
//! - **LSB image**: one bit per sample over the flattened pixel grid, ended by
//!   a null byte.
//! - **PVD image**: a variable number of bits per horizontal pixel pair,
//!   depending on the pair's difference, behind a 32-bit length prefix.
//! - **LSB audio**: one bit per PCM frame byte, ended by a null byte.
//!
//! Payload characters are limited to code points 0-255 (8 bits each). The
//! payload is not encrypted, and lossy re-encoding of the carrier destroys it.
//!
//! ## Example Usage
//!
//! ```rust
//! use steganote::stego::{PixelGrid, PvdImageCodec, StegoCodec};
//!
//! let samples = (0..64 * 64 * 3).map(|i| (i * 31 % 251) as u8).collect();
//! let mut carrier = PixelGrid::new(64, 64, 3, samples).unwrap();
//!
//! let codec = PvdImageCodec::default();
//! codec.embed(&mut carrier, "meet at dawn").unwrap();
//!
//! assert_eq!(codec.extract(&carrier), "meet at dawn");
//! ```
//!
//! ## Modules
//!
//! - [`bits`]: text to bit-stream conversion
//! - [`stego`]: carriers and the embedding schemes
//! - [`config`]: tool defaults stored as TOML

pub mod bits;
pub mod config;
pub mod stego;

// Re-export commonly used types at the crate root
pub use bits::{decode_text, encode_text, BitString};
pub use config::{ImageMethod, StegoConfig};
pub use stego::{
    LsbAudioCodec, LsbImageCodec, PcmBuffer, PcmFormat, PixelGrid, PvdImageCodec, PvdVariant,
    Scheme, StegoCodec, StegoError,
};
