// Command-line interface

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

use crate::config::Config;
use crate::downloader::errors::{AppError, AppResult};
use crate::downloader::extractors::ExtractorConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Video URL
    #[arg(short = 'l', value_name = "URL")]
    pub link: Option<String>,

    /// Directory to save the video in
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// SOCKS5/HTTP proxy for yt-dlp and the media download
    #[arg(long)]
    pub proxy: Option<String>,

    /// cookies.txt file passed to yt-dlp
    #[arg(long, conflicts_with = "cookies_from_browser")]
    pub cookies: Option<String>,

    /// Browser to load cookies from (chrome, firefox, ...)
    #[arg(long, value_name = "BROWSER")]
    pub cookies_from_browser: Option<String>,

    /// YouTube player client to try first (android, web, tv)
    #[arg(long)]
    pub player_client: Option<String>,

    /// Seconds allowed for fetching video info
    #[arg(long, default_value_t = 30)]
    pub timeout: u32,

    /// Path to the yt-dlp binary
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub ytdlp: Option<String>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Validate arguments; a missing or empty URL is fatal
    pub fn into_config(self) -> AppResult<Config> {
        let url = match self.link {
            Some(link) if !link.trim().is_empty() => link,
            _ => return Err(AppError::MissingUrl),
        };

        let extractor = ExtractorConfig::default()
            .with_ytdlp_path(self.ytdlp)
            .with_proxy(self.proxy)
            .with_cookies_path(self.cookies)
            .with_cookies_from_browser(self.cookies_from_browser)
            .with_player_client(self.player_client)
            .with_timeout(self.timeout);

        Ok(Config::new(url)
            .with_output_dir(self.output_dir)
            .with_extractor(extractor))
    }
}
