//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Resource library downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "resource-downloader",
    version,
    about = "Download ebooks and audio from a community resource library",
    long_about = "A CLI tool to download ebook and audio resources from a community library.\n\n\
                  Downloads can target direct URLs or library resource ids, with progress\n\
                  reporting and automatic fallback between download mechanisms."
)]
pub struct Args {
    /// Direct URL(s) of files to download.
    #[arg(short, long, num_args = 1..)]
    pub url: Option<Vec<String>>,

    /// Library resource id(s) to download.
    #[arg(short, long, num_args = 1..)]
    pub resource: Option<Vec<u64>>,

    /// List available library resources and exit.
    #[arg(long)]
    pub list: bool,

    /// File name to save under (single download only).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory where downloaded files are saved.
    #[arg(short = 'd', long = "directory")]
    pub save_directory: Option<PathBuf>,

    /// Base URL of the resource library API.
    #[arg(long = "api-url", env = "RESOURCE_API_URL")]
    pub api_url: Option<String>,

    /// API bearer token.
    #[arg(short, long, env = "RESOURCE_API_TOKEN")]
    pub token: Option<String>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Skip the download confirmation prompt.
    #[arg(short = 'y', long = "yes")]
    pub assume_yes: bool,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.clone();
        }

        if let Some(token) = &self.token {
            config.api.authorization_token = Some(token.clone());
        }

        if let Some(dir) = &self.save_directory {
            config.options.save_directory = Some(dir.clone());
        }

        // Boolean flags (only override if set to non-default)
        if self.assume_yes {
            config.options.confirm_downloads = false;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
