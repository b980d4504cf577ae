//! Error types for the embedding engine.

use std::fmt;

use thiserror::Error;

/// Identifies which codec (or carrier container) an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Fixed-rate LSB over image samples.
    LsbImage,
    /// Adaptive pixel-value differencing over image pixel pairs.
    PvdImage,
    /// Fixed-rate LSB over PCM frame bytes.
    LsbAudio,
    /// Image container (decode/encode of PNG, BMP, ...).
    ImageContainer,
    /// WAV container.
    WavContainer,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LsbImage => "lsb-image",
            Self::PvdImage => "pvd-image",
            Self::LsbAudio => "lsb-audio",
            Self::ImageContainer => "image",
            Self::WavContainer => "wav",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while embedding into or loading a carrier.
///
/// Extraction never fails: a carrier without a valid payload yields an empty
/// or partial string instead.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("{scheme}: message needs {needed} bits, carrier holds {available}")]
    CapacityExceeded {
        scheme: Scheme,
        needed: usize,
        available: usize,
    },

    #[error("{scheme}: invalid carrier: {reason}")]
    InvalidCarrier { scheme: Scheme, reason: String },

    #[error("unsupported character {character:?} at position {position} (code point above 255)")]
    UnsupportedCharacter { character: char, position: usize },

    #[error("{container}: failed to write carrier: {reason}")]
    WriteFailed { container: Scheme, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StegoError {
    pub(crate) fn invalid(scheme: Scheme, reason: impl Into<String>) -> Self {
        Self::InvalidCarrier {
            scheme,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_codec() {
        let err = StegoError::CapacityExceeded {
            scheme: Scheme::LsbImage,
            needed: 24,
            available: 16,
        };
        assert_eq!(
            err.to_string(),
            "lsb-image: message needs 24 bits, carrier holds 16"
        );

        let err = StegoError::invalid(Scheme::WavContainer, "float samples");
        assert_eq!(err.to_string(), "wav: invalid carrier: float samples");
    }
}
