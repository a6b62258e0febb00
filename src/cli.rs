use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipforged")]
#[command(author, version, about = "Clip time ranges out of remote streaming video")]
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
    /// Start the HTTP clip server
    Start {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Extract a single clip and save it locally
    Clip {
        /// Source video URL
        #[arg(required = true)]
        url: String,

        /// Start offset in seconds
        #[arg(short, long)]
        start: f64,

        /// End offset in seconds
        #[arg(short, long)]
        end: f64,

        /// Title used to name the output file
        #[arg(short, long)]
        title: Option<String>,

        /// Directory to write the clip into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Check that yt-dlp is installed and runnable
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
