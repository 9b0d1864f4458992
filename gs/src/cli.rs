//! CLI argument parsing for gpsstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::render::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gs")]
#[command(author, version, about = "Per-channel GPS point store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store directory (overrides config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Server id (overrides config)
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Channel id (overrides config)
    #[arg(short = 'n', long, global = true)]
    pub channel: Option<String>,

    /// Output format: text or json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add one or more GPS points (GPS:<name>:<x>:<y>:<z>:)
    Add {
        /// Point text; several records may be concatenated
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List every point in the channel
    List,

    /// Search points by name, by distance to a reference, or within a radius
    Search {
        /// Case-insensitive name substring
        #[arg(long)]
        name: Option<String>,

        /// Reference point (GPS:<name>:<x>:<y>:<z>:)
        #[arg(short, long)]
        reference: Option<String>,

        /// Radius around the reference in kilometers
        #[arg(short, long, requires = "reference")]
        distance_km: Option<f64>,
    },

    /// Remove points by 1-based index range (inclusive)
    Remove {
        /// First index to remove
        #[arg(required = true)]
        start: usize,

        /// Last index to remove
        #[arg(required = true)]
        end: usize,
    },

    /// Restrict the server's point commands to this channel
    Bind,

    /// Lift the server's channel restriction
    Unbind,
}
