#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CommandOutcome;
pub use toml_config::GalleryConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "gallery-modal")]
#[command(about = "Open portfolio images with their comments and post new ones")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Comment service endpoint (overrides the config file)")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Request timeout in seconds (overrides the config file)")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Print the comment area as escaped HTML")]
    pub html: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the modal for an image and list its comments
    Show {
        index: u32,
        #[arg(long)]
        src: Option<String>,
        #[arg(long)]
        alt: Option<String>,
    },
    /// Post a comment on an image, then show the refreshed list
    Post {
        index: u32,
        #[arg(long)]
        username: String,
        #[arg(long)]
        body: String,
    },
}
