// Blocking diagnostics - recognizes why the service refused a video
//
// yt-dlp and the media servers only hand back free-form error text. The
// patterns below map that text to a reason the user can act on.

/// Reasons why the service might refuse a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// HTTP 403 Forbidden - general access denied
    Http403Forbidden,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// Network timeout (soft IP block)
    NetworkTimeout,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection triggered
    BotDetection,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// DRM-protected content
    DrmProtected,

    /// Requires channel membership
    MembersOnly,

    Unknown,
}

impl BlockingReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout (possible IP throttling)",
            Self::RateLimited => "Rate limited by the service",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
            Self::Unknown => "Unknown blocking reason",
        }
    }

    /// What the user can try next
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Http403Forbidden => Some("try --cookies-from-browser or a proxy with --proxy"),
            Self::AgeRestricted => Some("pass cookies of a signed-in account with --cookies or --cookies-from-browser"),
            Self::GeoBlocked => Some("use --proxy with a server in a region where the video is available"),
            Self::NetworkTimeout => Some("check the connection or raise --timeout"),
            Self::RateLimited | Self::BotDetection => Some("wait a while or switch network with --proxy"),
            Self::PrivateVideo | Self::MembersOnly => Some("only accounts with access can download it; pass their cookies"),
            Self::VideoUnavailable => Some("the video was removed or never existed"),
            Self::DrmProtected => Some("DRM-protected videos cannot be downloaded as files"),
            Self::Unknown => None,
        }
    }
}

/// Analyze error message and return blocking reason
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    let lower = error.to_lowercase();

    // Check patterns in order of specificity

    if lower.contains("drm")
        || lower.contains("widevine")
        || lower.contains("playready")
        || lower.contains("fairplay")
        || lower.contains("requires purchase")
        || lower.contains("youtube premium")
    {
        return Some(BlockingReason::DrmProtected);
    }

    if lower.contains("members only")
        || lower.contains("members-only")
        || lower.contains("join this channel")
        || lower.contains("available to members")
    {
        return Some(BlockingReason::MembersOnly);
    }

    if lower.contains("age-restricted")
        || lower.contains("sign in to confirm your age")
        || lower.contains("age_verification")
    {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
        || lower.contains("sign in if you've been granted access")
    {
        return Some(BlockingReason::PrivateVideo);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("no longer available")
        || lower.contains("video is unavailable")
    {
        return Some(BlockingReason::VideoUnavailable);
    }

    if lower.contains("not available in your country")
        || lower.contains("blocked in your country")
        || lower.contains("geo restrict")
        || lower.contains("geo-restrict")
    {
        return Some(BlockingReason::GeoBlocked);
    }

    if lower.contains("429") || lower.contains("rate limit") || lower.contains("too many requests") {
        return Some(BlockingReason::RateLimited);
    }

    if lower.contains("not a bot")
        || lower.contains("captcha")
        || lower.contains("unusual traffic")
    {
        return Some(BlockingReason::BotDetection);
    }

    if lower.contains("403") || lower.contains("forbidden") {
        return Some(BlockingReason::Http403Forbidden);
    }

    if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection refused")
        || lower.contains("network unreachable")
    {
        return Some(BlockingReason::NetworkTimeout);
    }

    if !error.is_empty() {
        return Some(BlockingReason::Unknown);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_403_detection() {
        let error = "ERROR: HTTP Error 403: Forbidden";
        assert_eq!(diagnose_error(error), Some(BlockingReason::Http403Forbidden));
    }

    #[test]
    fn test_age_restricted_detection() {
        let error = "Sign in to confirm your age";
        assert_eq!(diagnose_error(error), Some(BlockingReason::AgeRestricted));
    }

    #[test]
    fn test_timeout_detection() {
        let error = "network timeout: <urlopen error timed out>";
        assert_eq!(diagnose_error(error), Some(BlockingReason::NetworkTimeout));
    }

    #[test]
    fn test_geo_detection() {
        let error = "Video not available in your country";
        assert_eq!(diagnose_error(error), Some(BlockingReason::GeoBlocked));
    }

    #[test]
    fn test_bot_detection() {
        let error = "Sign in to confirm you're not a bot";
        assert_eq!(diagnose_error(error), Some(BlockingReason::BotDetection));
    }

    #[test]
    fn test_drm_detection() {
        assert_eq!(diagnose_error("This video is DRM protected"), Some(BlockingReason::DrmProtected));
        assert_eq!(BlockingReason::DrmProtected.description(), "DRM-protected content");
    }

    #[test]
    fn test_unknown_has_no_hint() {
        assert_eq!(diagnose_error("boom"), Some(BlockingReason::Unknown));
        assert!(BlockingReason::Unknown.hint().is_none());
        assert_eq!(diagnose_error(""), None);
    }
}
