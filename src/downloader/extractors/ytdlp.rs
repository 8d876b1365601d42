// yt-dlp video source
//
// Metadata comes from `yt-dlp --dump-json`; the chosen rendition is then
// fetched directly from its media URL with reqwest, so yt-dlp never touches
// the output file.

use std::collections::HashMap;
use std::io;
use std::process::Command as StdCommand;

use async_trait::async_trait;
use futures::TryStreamExt;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tokio_util::io::StreamReader;
use tracing::{debug, info, warn};

use super::config::ExtractorConfig;
use crate::downloader::errors::ExtractorError;
use crate::downloader::models::{Rendition, StreamLocator, VideoMetadata};
use crate::downloader::traits::{ByteStream, VideoSource};
use crate::downloader::utils::{is_youtube_url, run_output_with_timeout};

/// Video source backed by the yt-dlp binary
pub struct YtDlpSource {
    ytdlp_path: String,
    config: ExtractorConfig,
}

impl YtDlpSource {
    pub fn new(config: ExtractorConfig) -> Self {
        let ytdlp_path = config.ytdlp_path.clone().unwrap_or_else(Self::find_ytdlp);
        Self { ytdlp_path, config }
    }

    /// Find yt-dlp binary
    fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp", // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp",    // Homebrew on Intel Mac
            "/usr/bin/yt-dlp",          // System installation
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return path.to_string();
            }
        }

        if let Ok(output) = StdCommand::new("which").arg("yt-dlp").output() {
            if output.status.success() {
                if let Ok(path) = String::from_utf8(output.stdout) {
                    let trimmed = path.trim();
                    if !trimmed.is_empty() {
                        return trimmed.to_string();
                    }
                }
            }
        }

        "yt-dlp".to_string()
    }

    /// Player clients to try for a URL, in order
    fn player_clients(&self, url: &str) -> Vec<Option<String>> {
        if !is_youtube_url(url) {
            return vec![None];
        }

        let defaults: &[&str] = if self.config.uses_cookies() {
            // web honours cookies best
            &["web", "android"]
        } else {
            &["android", "tv", "web"]
        };

        let mut clients: Vec<Option<String>> = Vec::new();
        if let Some(preferred) = &self.config.player_client {
            clients.push(Some(preferred.clone()));
        }
        for client in defaults {
            if self.config.player_client.as_deref() != Some(*client) {
                clients.push(Some(client.to_string()));
            }
        }
        clients
    }

    /// Build command arguments
    fn build_args(&self, url: &str, client: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.config.timeout_seconds.to_string(),
        ];

        if let Some(client) = client {
            args.push("--extractor-args".to_string());
            args.push(format!("youtube:player_client={}", client));
        }

        if let Some(path) = &self.config.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.clone());
        } else if let Some(browser) = &self.config.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        }

        if let Some(proxy) = &self.config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(url.to_string());
        args
    }

    /// Parse `--dump-json` output
    pub fn parse_json(stdout: &[u8]) -> Result<VideoMetadata, ExtractorError> {
        let json: Value = serde_json::from_slice(stdout)
            .map_err(|e| ExtractorError::ParseError(format!("Invalid JSON: {}", e)))?;

        let formats = json["formats"]
            .as_array()
            .ok_or_else(|| ExtractorError::ParseError("No formats array in JSON".to_string()))?;

        let renditions = formats.iter().filter_map(Self::parse_format).collect();

        Ok(VideoMetadata {
            id: json["id"].as_str().unwrap_or("unknown").to_string(),
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            renditions,
        })
    }

    /// Map one yt-dlp format; manifest-only formats have no directly readable URL
    fn parse_format(f: &Value) -> Option<Rendition> {
        let url = f["url"].as_str().filter(|u| !u.is_empty())?;
        let protocol = f["protocol"].as_str().unwrap_or("https");
        if protocol != "https" && protocol != "http" {
            return None;
        }

        let http_headers: HashMap<String, String> = f["http_headers"]
            .as_object()
            .map(|headers| {
                headers
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let locator = StreamLocator {
            format_id: f["format_id"].as_str().unwrap_or("").to_string(),
            url: url.to_string(),
            http_headers,
        };

        Some(
            Rendition::new(
                Self::quality_label(f),
                Self::audio_channels(f),
                f["filesize"].as_u64().unwrap_or(0),
            )
            .with_locator(locator),
        )
    }

    /// "1080p"-style label; empty for formats without video
    fn quality_label(f: &Value) -> String {
        lazy_static::lazy_static! {
            static ref LABEL_RE: Regex = Regex::new(r"^\d+p\d*$").unwrap();
        }

        if let Some(note) = f["format_note"].as_str() {
            if LABEL_RE.is_match(note) {
                return note.to_string();
            }
        }

        let has_video = f["vcodec"]
            .as_str()
            .map_or(false, |v| v != "none" && !v.is_empty());

        match f["height"].as_u64() {
            Some(height) if has_video => format!("{}p", height),
            _ => String::new(),
        }
    }

    fn audio_channels(f: &Value) -> u32 {
        if let Some(channels) = f["audio_channels"].as_u64() {
            return u32::try_from(channels).unwrap_or(u32::MAX);
        }

        // Channel count missing: assume stereo when an audio codec is present
        match f["acodec"].as_str() {
            Some(codec) if codec != "none" && !codec.is_empty() => 2,
            _ => 0,
        }
    }

    /// stderr of a failed run, or the exit status when yt-dlp printed nothing
    fn failure_text(out: &std::process::Output) -> String {
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        if stderr.is_empty() {
            format!("yt-dlp exited with {}", out.status)
        } else {
            stderr
        }
    }

    fn build_headers(locator: &StreamLocator) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in &locator.http_headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "skipping invalid request header"),
            }
        }
        headers
    }

    fn http_client(&self) -> Result<reqwest::Client, ExtractorError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = self.config.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ExtractorError::InvalidUrl(format!("proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }
        builder.build().map_err(ExtractorError::from)
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractorError> {
        let mut last_error = ExtractorError::Unknown("No clients to try".to_string());

        for client in self.player_clients(url) {
            let args = self.build_args(url, client.as_deref());
            debug!(
                client = client.as_deref().unwrap_or("default"),
                "{} {}",
                self.ytdlp_path,
                args.join(" ")
            );

            let output = run_output_with_timeout(
                &self.ytdlp_path,
                &args,
                self.config.timeout_seconds as u64,
            )
            .await;

            match output {
                Ok(out) if out.status.success() => {
                    let video = Self::parse_json(&out.stdout)?;
                    info!(
                        id = %video.id,
                        renditions = video.renditions.len(),
                        "fetched video info"
                    );
                    return Ok(video);
                }
                Ok(out) => {
                    let reason = Self::failure_text(&out);
                    warn!(client = client.as_deref().unwrap_or("default"), "yt-dlp failed: {}", reason);
                    last_error = ExtractorError::from(reason);
                }
                Err(e @ ExtractorError::ToolNotFound(_)) => return Err(e),
                Err(e) => {
                    warn!(client = client.as_deref().unwrap_or("default"), "yt-dlp error: {}", e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn open_stream(
        &self,
        video: &VideoMetadata,
        rendition: &Rendition,
    ) -> Result<ByteStream, ExtractorError> {
        let locator = &rendition.locator;
        if locator.url.is_empty() {
            return Err(ExtractorError::InvalidUrl(format!(
                "format {} of {} has no media URL",
                locator.format_id, video.id
            )));
        }

        debug!(id = %video.id, format = %locator.format_id, "opening media stream");
        let response = self
            .http_client()?
            .get(&locator.url)
            .headers(Self::build_headers(locator))
            .send()
            .await?
            .error_for_status()?;

        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));

        Ok(Box::new(StreamReader::new(Box::pin(body))))
    }
}
