use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SinkKind;

pub mod commands;

#[derive(Parser)]
#[command(name = "gift-swap")]
#[command(about = "Draw a gift exchange and send everyone their assignment")]
#[command(long_about = "gift-swap reads an event file with the exchange details and participants, \
                       draws who gives to whom so nobody gets themselves, and hands the result to \
                       a notification sink. Start with 'gift-swap check --event event.toml'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the event file, draw assignments and dispatch them
    Draw {
        /// Event file (TOML) with [event] and [[participants]] sections
        #[arg(long, short = 'e', help = "Path to the event file")]
        event: PathBuf,
        /// Override the configured notification sink
        #[arg(long, value_enum, help = "Where to send the assignments")]
        sink: Option<SinkKind>,
        /// Override the output path used by the file sink
        #[arg(long, short = 'o', help = "Output path for the file sink")]
        output: Option<PathBuf>,
    },
    /// Validate the event file without drawing
    Check {
        /// Event file (TOML) with [event] and [[participants]] sections
        #[arg(long, short = 'e', help = "Path to the event file")]
        event: PathBuf,
    },
}
