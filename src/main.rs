//! steganote - hide text in images and WAV audio
//!
//! A CLI tool for LSB and PVD steganography. The carrier is modified in
//! place and must be kept in a lossless container.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{CapacityCommand, CommandExecutor, HideCommand, UnhideCommand};
use steganote::config::{ConfigError, StegoConfig};

/// steganote - hide text in images and WAV audio
///
/// Images use PVD (pixel-value differencing) or LSB; WAV audio uses LSB.
#[derive(Parser)]
#[command(name = "steganote")]
#[command(version)]
#[command(about = "Hide text in images (PVD, LSB) and WAV audio (LSB)")]
#[command(long_about = None)]
struct Cli {
    /// Config file (default: ~/.steganote/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a text message in an image or WAV file
    Hide(HideCommand),

    /// Recover a hidden message from an image or WAV file
    Unhide(UnhideCommand),

    /// Show how much text a carrier can hold
    Capacity(CapacityCommand),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<StegoConfig> {
    match path {
        Some(path) => StegoConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => match StegoConfig::load() {
            Err(e @ ConfigError::NoConfigDir) => {
                log::debug!("{e}, using defaults");
                Ok(StegoConfig::default())
            }
            result => result.context("Failed to load ~/.steganote/config.toml"),
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    log::debug!("config: {config:?}");

    match &cli.command {
        Commands::Hide(cmd) => cmd.execute(&config),
        Commands::Unhide(cmd) => cmd.execute(&config),
        Commands::Capacity(cmd) => cmd.execute(&config),
    }
}
