// Extractor configuration

/// Configuration for info extraction and stream opening
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Explicit yt-dlp binary; searched for when unset
    pub ytdlp_path: Option<String>,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<String>,
    /// Browser to read cookies from (chrome, firefox, ...)
    pub cookies_from_browser: Option<String>,
    /// Metadata request timeout in seconds
    pub timeout_seconds: u32,
    /// YouTube player client tried first (android, web, tv)
    pub player_client: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            proxy: None,
            cookies_path: None,
            cookies_from_browser: None,
            timeout_seconds: 30,
            player_client: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_ytdlp_path(mut self, path: Option<String>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<String>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_cookies_from_browser(mut self, browser: Option<String>) -> Self {
        self.cookies_from_browser = browser;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_player_client(mut self, client: Option<String>) -> Self {
        self.player_client = client;
        self
    }

    pub fn uses_cookies(&self) -> bool {
        self.cookies_path.is_some() || self.cookies_from_browser.is_some()
    }
}
