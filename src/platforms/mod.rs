pub mod generic;
pub mod instagram;
pub mod tiktok;
pub mod traits;

/// Closed set of platform tags. Classification is pure substring
/// inspection of the URL, no network involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Facebook,
    Twitter,
    Pinterest,
    Reddit,
    Vimeo,
    Unknown,
}

/// Domain families checked in fixed priority order; the first match wins.
const DETECTION_RULES: &[(Platform, &[&str])] = &[
    (Platform::TikTok, &["tiktok.com", "vm.tiktok.com"]),
    (Platform::Instagram, &["instagram.com"]),
    (Platform::Facebook, &["facebook.com", "fb.watch"]),
    (Platform::Twitter, &["twitter.com", "x.com"]),
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::Pinterest, &["pinterest.com", "pin.it"]),
    (Platform::Reddit, &["reddit.com"]),
    (Platform::Vimeo, &["vimeo.com"]),
];

impl Platform {
    pub fn detect(url: &str) -> Platform {
        let lower = url.to_lowercase();
        for (platform, domains) in DETECTION_RULES {
            if domains.iter().any(|domain| lower.contains(domain)) {
                return *platform;
            }
        }
        Platform::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Pinterest => "pinterest",
            Platform::Reddit => "reddit",
            Platform::Vimeo => "vimeo",
            Platform::Unknown => "unknown",
        }
    }

    /// Capitalized tag used in user-facing failure messages
    /// ("Tiktok videosu alinamadi").
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::YouTube => "Youtube",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "Tiktok",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
            Platform::Pinterest => "Pinterest",
            Platform::Reddit => "Reddit",
            Platform::Vimeo => "Vimeo",
            Platform::Unknown => "Unknown",
        }
    }
}

/// User-facing failure string for a strategy that blew up inside the
/// extractor tool. The cause is clipped so upstream stack traces never
/// leak wholesale into the envelope.
pub(crate) fn extraction_failure(err: &anyhow::Error) -> String {
    let cause = err.to_string();
    let clipped: String = cause.chars().take(100).collect();
    format!("Video alinamadi: {}", clipped)
}
