use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "npo",
    about = "Resolve NPO Start watch pages to stream manifests and download clear streams",
    version,
    author
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Netscape-format cookie file (overrides the configured path)
    #[arg(long, global = true)]
    pub cookies: Option<PathBuf>,

    /// Request timeout in seconds (overrides the configured value)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Accept the legacy /start/serie/.../afspelen url form
    #[arg(long, global = true)]
    pub legacy: bool,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true)]
    pub proxy: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the stream URL and DRM token for a watch page
    Resolve {
        /// The watch-page URL
        url: String,
    },

    /// Resolve a watch page and download the stream with the external downloader
    Extract {
        /// The watch-page URL
        url: String,

        /// Downloader binary (overrides the configured one)
        #[arg(long)]
        downloader: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}
