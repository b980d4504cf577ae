//! Hide command - embed a text message in an image or WAV carrier.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use steganote::bits::latin1_decode;
use steganote::config::StegoConfig;
use steganote::stego::image::ensure_lossless;

use super::{CarrierArgs, CarrierKind, CommandExecutor};

/// Hide a text message in a carrier.
///
/// Images use PVD by default (or LSB with --method lsb); WAV audio always
/// uses LSB. The output must be a lossless container: PNG/BMP/TIFF/PNM for
/// images, WAV for audio. Characters must be in the range U+0000..=U+00FF.
#[derive(Args, Debug)]
pub struct HideCommand {
    #[command(flatten)]
    pub carrier: CarrierArgs,

    /// Where to write the stego carrier
    #[arg(short, long)]
    pub output: PathBuf,

    /// Text message to hide (mutually exclusive with --message-file)
    #[arg(short, long, conflicts_with = "message_file", required_unless_present = "message_file")]
    pub message: Option<String>,

    /// Read the message from a file; each byte is one character (Latin-1)
    #[arg(long, conflicts_with = "message")]
    pub message_file: Option<PathBuf>,
}

impl HideCommand {
    fn read_message(&self) -> Result<String> {
        match (&self.message, &self.message_file) {
            (Some(message), _) => Ok(message.clone()),
            (None, Some(path)) => std::fs::read(path)
                .map(|bytes| latin1_decode(&bytes))
                .with_context(|| format!("Failed to read message from {}", path.display())),
            (None, None) => bail!("Provide either --message or --message-file"),
        }
    }
}

/// Refuses outputs whose container would destroy the hidden bits.
fn check_output(path: &Path, kind: CarrierKind) -> Result<()> {
    match kind {
        CarrierKind::Audio => {
            if CarrierKind::from_path(path) != CarrierKind::Audio {
                bail!("Audio output must be a .wav file: {}", path.display());
            }
        }
        CarrierKind::Image => {
            let format = image::ImageFormat::from_path(path)
                .with_context(|| format!("Unknown image format: {}", path.display()))?;
            ensure_lossless(format).with_context(|| {
                format!("Refusing to write {}: use PNG or BMP", path.display())
            })?;
        }
    }
    Ok(())
}

impl CommandExecutor for HideCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let settings = self.carrier.settings(config)?;
        check_output(&self.output, settings.kind)?;

        let message = self.read_message()?;
        let mut carrier = self.carrier.load(&settings)?;
        let report = carrier.capacity(&settings);

        let scheme = carrier
            .embed(&settings, &message)
            .context("Failed to hide message")?;
        carrier
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!("Message hidden using {}: {}", scheme, self.output.display());
        println!(
            "  Characters: {} (capacity about {})",
            message.chars().count(),
            report.chars
        );
        Ok(())
    }
}
