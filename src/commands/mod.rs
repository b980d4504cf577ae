//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Shared carrier loading and codec dispatch live here.

mod capacity;
mod hide;
mod unhide;

pub use capacity::CapacityCommand;
pub use hide::HideCommand;
pub use unhide::UnhideCommand;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use steganote::config::{ImageMethod, StegoConfig};
use steganote::stego::{
    LsbAudioCodec, LsbImageCodec, PcmBuffer, PixelGrid, PvdImageCodec, PvdVariant, Scheme,
    StegoCodec, StegoError,
};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic. Configuration is passed in
/// explicitly; commands keep no state between runs.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, config: &StegoConfig) -> Result<()>;
}

/// Kind of carrier file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CarrierKind {
    Image,
    Audio,
}

impl CarrierKind {
    /// Guesses the kind from the file extension: `.wav` is audio, anything
    /// else is handed to the image decoder.
    pub fn from_path(path: &Path) -> Self {
        let is_wav = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if is_wav {
            Self::Audio
        } else {
            Self::Image
        }
    }
}

/// Carrier selection shared by all commands.
#[derive(Args, Debug)]
pub struct CarrierArgs {
    /// Path to the carrier file (PNG/BMP/... image or WAV audio)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Carrier kind (default: guessed from the extension)
    #[arg(long, value_enum)]
    pub kind: Option<CarrierKind>,

    /// Image embedding method (default: from config, else pvd)
    #[arg(long, value_enum)]
    pub method: Option<ImageMethod>,

    /// PVD pixel update rule: range-preserving (safe) or legacy (older encoders)
    #[arg(long, value_enum)]
    pub variant: Option<PvdVariant>,
}

/// Codec choice after merging flags with the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub kind: CarrierKind,
    pub method: ImageMethod,
    pub variant: PvdVariant,
}

impl CarrierArgs {
    pub fn settings(&self, config: &StegoConfig) -> Result<Settings> {
        let kind = self
            .kind
            .unwrap_or_else(|| CarrierKind::from_path(&self.carrier));
        if kind == CarrierKind::Audio && self.method == Some(ImageMethod::Pvd) {
            bail!("PVD works on images only; audio carriers always use LSB");
        }
        Ok(Settings {
            kind,
            method: self.method.unwrap_or(config.image_method),
            variant: self.variant.unwrap_or(config.pvd_variant),
        })
    }

    pub fn load(&self, settings: &Settings) -> Result<LoadedCarrier> {
        let path = &self.carrier;
        let carrier = match settings.kind {
            CarrierKind::Image => LoadedCarrier::Image(
                PixelGrid::from_file(path)
                    .with_context(|| format!("Failed to load image {}", path.display()))?,
            ),
            CarrierKind::Audio => LoadedCarrier::Audio(
                PcmBuffer::from_file(path)
                    .with_context(|| format!("Failed to load audio {}", path.display()))?,
            ),
        };
        log::info!("loaded {:?} carrier from {}", settings.kind, path.display());
        Ok(carrier)
    }
}

/// A decoded carrier of either kind.
pub enum LoadedCarrier {
    Image(PixelGrid),
    Audio(PcmBuffer),
}

/// Capacity report for a carrier under one scheme.
pub struct CapacityReport {
    pub scheme: Scheme,
    pub bits: usize,
    pub chars: usize,
}

impl LoadedCarrier {
    /// Embeds `text`, returning the scheme used.
    pub fn embed(&mut self, settings: &Settings, text: &str) -> Result<Scheme, StegoError> {
        match self {
            Self::Image(grid) => match settings.method {
                ImageMethod::Pvd => embed_with(&PvdImageCodec::new(settings.variant), grid, text),
                ImageMethod::Lsb => embed_with(&LsbImageCodec, grid, text),
            },
            Self::Audio(buffer) => embed_with(&LsbAudioCodec, buffer, text),
        }
    }

    /// Extracts hidden text, returning the scheme used.
    pub fn extract(&self, settings: &Settings) -> (Scheme, String) {
        match self {
            Self::Image(grid) => match settings.method {
                ImageMethod::Pvd => extract_with(&PvdImageCodec::new(settings.variant), grid),
                ImageMethod::Lsb => extract_with(&LsbImageCodec, grid),
            },
            Self::Audio(buffer) => extract_with(&LsbAudioCodec, buffer),
        }
    }

    pub fn capacity(&self, settings: &Settings) -> CapacityReport {
        match self {
            Self::Image(grid) => match settings.method {
                ImageMethod::Pvd => capacity_with(&PvdImageCodec::new(settings.variant), grid),
                ImageMethod::Lsb => capacity_with(&LsbImageCodec, grid),
            },
            Self::Audio(buffer) => capacity_with(&LsbAudioCodec, buffer),
        }
    }

    /// One-line summary of the carrier's shape.
    pub fn describe(&self) -> String {
        match self {
            Self::Image(grid) => format!(
                "{}x{} image, {} channel(s)",
                grid.cols(),
                grid.rows(),
                grid.channels()
            ),
            Self::Audio(buffer) => {
                let format = buffer.format();
                format!(
                    "{:.2}s of {}-bit audio, {} channel(s) at {} Hz",
                    buffer.duration_secs(),
                    format.sample_width * 8,
                    format.channels,
                    format.frame_rate
                )
            }
        }
    }

    /// Writes the carrier back in a lossless container.
    pub fn save(&self, path: &Path) -> Result<(), StegoError> {
        match self {
            Self::Image(grid) => grid.save(path),
            Self::Audio(buffer) => buffer.save(path),
        }
    }
}

fn embed_with<C: StegoCodec>(
    codec: &C,
    carrier: &mut C::Carrier,
    text: &str,
) -> Result<Scheme, StegoError> {
    codec.embed(carrier, text)?;
    Ok(codec.scheme())
}

fn extract_with<C: StegoCodec>(codec: &C, carrier: &C::Carrier) -> (Scheme, String) {
    (codec.scheme(), codec.extract(carrier))
}

fn capacity_with<C: StegoCodec>(codec: &C, carrier: &C::Carrier) -> CapacityReport {
    CapacityReport {
        scheme: codec.scheme(),
        bits: codec.capacity_bits(carrier),
        chars: codec.max_message_chars(carrier),
    }
}
