//! CLI Module
//!
//! Command-line interface for the pcmfx transforms.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dsp::{EchoConfig, DEFAULT_DELAY, DEFAULT_VOLUME_SCALE};
use crate::error::Result;

/// pcmfx - offline transforms for 16-bit PCM WAV files
#[derive(Parser, Debug)]
#[command(name = "pcmfx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mix a delayed, attenuated copy of the audio back into itself
    #[command(name = "addecho")]
    AddEcho {
        /// Echo delay in samples
        #[arg(short = 'd', value_name = "delay", default_value_t = DEFAULT_DELAY)]
        delay: usize,

        /// Divisor applied to the echoed samples
        #[arg(short = 'v', value_name = "volume_scale", default_value_t = DEFAULT_VOLUME_SCALE)]
        volume_scale: u32,

        /// Print a JSON run report to stdout
        #[arg(long)]
        json: bool,

        /// Input WAV file
        #[arg(value_name = "sourcewav")]
        source: PathBuf,

        /// Output WAV file
        #[arg(value_name = "destwav")]
        dest: PathBuf,
    },

    /// Cancel center-panned content in interleaved stereo audio
    #[command(name = "remvocals")]
    RemVocals {
        /// Print a JSON run report to stdout
        #[arg(long)]
        json: bool,

        /// Input WAV file
        #[arg(value_name = "sourcewav")]
        source: PathBuf,

        /// Output WAV file
        #[arg(value_name = "destwav")]
        dest: PathBuf,
    },
}

/// Run a parsed command
pub fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::AddEcho {
            delay,
            volume_scale,
            json,
            source,
            dest,
        } => {
            let config = EchoConfig::new(delay, volume_scale)?;
            let report = commands::add_echo(&source, &dest, config)?;
            if json {
                commands::print_report(&report)?;
            }
            Ok(())
        }
        Commands::RemVocals { json, source, dest } => {
            let report = commands::remove_vocals(&source, &dest)?;
            if json {
                commands::print_report(&report)?;
            }
            Ok(())
        }
    }
}
