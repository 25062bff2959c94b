use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mirrorcast")]
#[command(author, version, about = "Content-addressed encrypted HLS across independent mirrors")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a media file into content-addressed segments and print its manifest
    Produce {
        /// Input media file
        #[arg(required = true)]
        input: PathBuf,

        /// Directory receiving the playlist and segments
        #[arg(required = true)]
        output_dir: PathBuf,

        /// Mirror base URL to list in the manifest (repeatable, in priority order)
        #[arg(short, long = "mirror")]
        mirrors: Vec<String>,

        /// Replace a non-empty output directory
        #[arg(long)]
        force: bool,
    },

    /// Read a manifest from stdin and write a resolved playlist to stdout
    Resolve {
        /// Write the decryption key here instead of the configured key directory
        #[arg(long)]
        key_out: Option<PathBuf>,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
