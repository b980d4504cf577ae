//! Capacity command - show how much text a carrier can hold.

use anyhow::Result;
use clap::Args;

use steganote::config::StegoConfig;

use super::{CarrierArgs, CommandExecutor};

/// Show how many bits and characters a carrier can hold.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    #[command(flatten)]
    pub carrier: CarrierArgs,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, config: &StegoConfig) -> Result<()> {
        let settings = self.carrier.settings(config)?;
        let carrier = self.carrier.load(&settings)?;
        let report = carrier.capacity(&settings);

        println!("Carrier: {}", self.carrier.carrier.display());
        println!("  Shape:      {}", carrier.describe());
        println!("  Scheme:     {}", report.scheme);
        println!("  Bits:       {}", report.bits);
        println!("  Characters: {}", report.chars);
        Ok(())
    }
}
