//! Unhide command - recover a text message from a stego carrier.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use steganote::bits::latin1_encode;
use steganote::config::StegoConfig;

use super::{CarrierArgs, CommandExecutor};

/// Recover a hidden message from a carrier.
///
/// NOTE: This command does not fail on carriers without a message - it prints
/// whatever was recovered, which may be empty or garbage. Use the same
/// --method and --variant that were used to hide the message.
#[derive(Args, Debug)]
pub struct UnhideCommand {
    #[command(flatten)]
    pub carrier: CarrierArgs,

    /// Write the message to this file instead of stdout, one byte per
    /// character (Latin-1)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for UnhideCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let settings = self.carrier.settings(config)?;
        let carrier = self.carrier.load(&settings)?;
        let (scheme, message) = carrier.extract(&settings);
        log::info!("{scheme}: recovered {} characters", message.chars().count());

        match &self.output {
            Some(path) => {
                let bytes = latin1_encode(&message)?;
                std::fs::write(path, bytes)
                    .with_context(|| format!("Failed to write to {}", path.display()))?;
                println!("Message written to: {}", path.display());
            }
            None => println!("{message}"),
        }
        Ok(())
    }
}
