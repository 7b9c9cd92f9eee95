//! Instagram extraction. Three scrape strategies run before the extractor
//! tool is ever involved: a mirror host that serves the post with a plain
//! `<source>` tag, the canonical page whose markup embeds the video URL in
//! JSON, and the `/embed/` variant of the post. Each is independent and
//! reports its own outcome.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use crate::core::http_client;
use crate::core::url_parser;
use crate::core::ytdlp::{YtdlpOptions, YtdlpRunner};
use crate::models::media::{Outcome, VideoResult};
use crate::platforms::traits::Extractor;
use crate::platforms::{extraction_failure, Platform};

const MIRROR_HOST: &str = "https://d.ddinstagram.com";
const MIRROR_TIMEOUT: Duration = Duration::from_secs(15);
const PAGE_TIMEOUT: Duration = Duration::from_secs(20);
const EMBED_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON string values arrive with their escapes intact.
fn unescape_json_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace("\\/", "/")
}

/// Fetches the post from the embed-mirror host and pulls the `src` of a
/// `<source>` tag whose type starts with "video". Needs a shortcode;
/// URLs without one are skipped.
pub struct MirrorFetchExtractor {
    client: reqwest::Client,
}

impl MirrorFetchExtractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client::build_client(http_client::IPHONE_UA, MIRROR_TIMEOUT)?,
        })
    }

    fn find_video_source(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(r#"source[type^="video"]"#).ok()?;
        document
            .select(&selector)
            .next()?
            .value()
            .attr("src")
            .map(|src| src.to_string())
    }
}

#[async_trait]
impl Extractor for MirrorFetchExtractor {
    fn name(&self) -> &'static str {
        "instagram-mirror"
    }

    async fn extract(&self, url: &str, _platform: Platform) -> Outcome {
        let clean = url_parser::clean_instagram_url(url);
        let shortcode = match url_parser::instagram_shortcode(&clean) {
            Some(code) => code,
            None => return Outcome::Miss,
        };

        tracing::debug!("instagram: trying mirror fetch for {}", shortcode);

        let mirror_url = format!("{}/reel/{}", MIRROR_HOST, shortcode);
        let response = match self
            .client
            .get(&mirror_url)
            .header("Accept", "text/html,*/*")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("instagram mirror fetch error: {}", e);
                return Outcome::Miss;
            }
        };

        if !response.status().is_success() {
            return Outcome::Miss;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("instagram mirror body error: {}", e);
                return Outcome::Miss;
            }
        };

        match Self::find_video_source(&html) {
            Some(video_url) => {
                tracing::debug!("instagram: mirror fetch success");
                Outcome::Found(VideoResult::bare(Platform::Instagram, "Instagram Reel", video_url))
            }
            None => Outcome::Miss,
        }
    }
}

/// Scrapes the canonical page with a mobile user-agent. Three embedded-JSON
/// patterns are tried in priority order.
pub struct DirectPageExtractor {
    client: reqwest::Client,
    video_url_re: Regex,
    content_url_re: Regex,
    og_video_re: Regex,
}

impl DirectPageExtractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client::build_client(http_client::MOBILE_SAFARI_UA, PAGE_TIMEOUT)?,
            video_url_re: Regex::new(r#""video_url":"([^"]+)""#)?,
            content_url_re: Regex::new(r#""contentUrl":"([^"]+)""#)?,
            og_video_re: Regex::new(r#"<meta[^>]+property="og:video"[^>]+content="([^"]+)""#)?,
        })
    }

    fn find_video_url(&self, html: &str) -> Option<String> {
        if let Some(captures) = self.video_url_re.captures(html) {
            return Some(unescape_json_url(captures.get(1)?.as_str()));
        }
        if let Some(captures) = self.content_url_re.captures(html) {
            return Some(unescape_json_url(captures.get(1)?.as_str()));
        }
        if let Some(captures) = self.og_video_re.captures(html) {
            return Some(captures.get(1)?.as_str().to_string());
        }
        None
    }
}

#[async_trait]
impl Extractor for DirectPageExtractor {
    fn name(&self) -> &'static str {
        "instagram-page"
    }

    async fn extract(&self, url: &str, _platform: Platform) -> Outcome {
        let clean = url_parser::clean_instagram_url(url);

        tracing::debug!("instagram: trying direct page scrape");

        let response = match self
            .client
            .get(&clean)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Sec-Fetch-Mode", "navigate")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("instagram page scrape error: {}", e);
                return Outcome::Miss;
            }
        };

        if !response.status().is_success() {
            return Outcome::Miss;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("instagram page body error: {}", e);
                return Outcome::Miss;
            }
        };

        match self.find_video_url(&html) {
            Some(video_url) => {
                tracing::debug!("instagram: page scrape success");
                Outcome::Found(VideoResult::bare(Platform::Instagram, "Instagram Video", video_url))
            }
            None => Outcome::Miss,
        }
    }
}

/// Repeats the `video_url` search against the post's `/embed/` variant,
/// which often still renders for posts the canonical page hides.
pub struct EmbedPageExtractor {
    client: reqwest::Client,
    video_url_re: Regex,
}

impl EmbedPageExtractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client::build_client(http_client::DESKTOP_UA, EMBED_TIMEOUT)?,
            video_url_re: Regex::new(r#""video_url":"([^"]+)""#)?,
        })
    }
}

#[async_trait]
impl Extractor for EmbedPageExtractor {
    fn name(&self) -> &'static str {
        "instagram-embed"
    }

    async fn extract(&self, url: &str, _platform: Platform) -> Outcome {
        let clean = url_parser::clean_instagram_url(url);
        let embed_url = url_parser::instagram_embed_url(&clean);

        tracing::debug!("instagram: trying embed page");

        let response = match self
            .client
            .get(&embed_url)
            .header("Accept", "text/html,*/*")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("instagram embed error: {}", e);
                return Outcome::Miss;
            }
        };

        if !response.status().is_success() {
            return Outcome::Miss;
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("instagram embed body error: {}", e);
                return Outcome::Miss;
            }
        };

        match self.video_url_re.captures(&html) {
            Some(captures) => match captures.get(1) {
                Some(m) => {
                    tracing::debug!("instagram: embed page success");
                    Outcome::Found(VideoResult::bare(
                        Platform::Instagram,
                        "Instagram Video",
                        unescape_json_url(m.as_str()),
                    ))
                }
                None => Outcome::Miss,
            },
            None => Outcome::Miss,
        }
    }
}

/// Runs the extractor tool with Instagram-specific options and takes the
/// first MP4 candidate.
pub struct InstagramYtdlpExtractor {
    runner: Arc<YtdlpRunner>,
}

impl InstagramYtdlpExtractor {
    pub fn new(runner: Arc<YtdlpRunner>) -> Self {
        Self { runner }
    }
}

fn parse_instagram_info(info: &serde_json::Value) -> Outcome {
    if info.is_null() {
        return Outcome::Failed("Video bilgisi alinamadi".to_string());
    }

    let formats = info.get("formats").and_then(|v| v.as_array());

    let mut download_url = formats.and_then(|formats| {
        formats
            .iter()
            .filter(|f| f.get("ext").and_then(|v| v.as_str()) == Some("mp4"))
            .find_map(|f| f.get("url").and_then(|v| v.as_str()))
            .or_else(|| formats.iter().find_map(|f| f.get("url").and_then(|v| v.as_str())))
            .map(|url| url.to_string())
    });

    if download_url.is_none() {
        download_url = info.get("url").and_then(|v| v.as_str()).map(|url| url.to_string());
    }

    let download_url = match download_url {
        Some(url) => url,
        None => return Outcome::Failed("Indirme URL bulunamadi".to_string()),
    };

    Outcome::Found(VideoResult {
        success: true,
        platform: Platform::Instagram.as_str().to_string(),
        title: info
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("Instagram Video")
            .to_string(),
        thumbnail: info
            .get("thumbnail")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        duration: info.get("duration").and_then(|v| v.as_f64()).unwrap_or(0.0) as u64,
        download_url,
        qualities: Vec::new(),
        author: info
            .get("uploader")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
    })
}

#[async_trait]
impl Extractor for InstagramYtdlpExtractor {
    fn name(&self) -> &'static str {
        "instagram-ytdlp"
    }

    async fn extract(&self, url: &str, _platform: Platform) -> Outcome {
        tracing::debug!("instagram: direct scraping failed, trying yt-dlp");

        match self.runner.fetch_info(url, &YtdlpOptions::instagram()).await {
            Ok(info) => parse_instagram_info(&info),
            Err(e) => {
                tracing::warn!("instagram yt-dlp error: {}", e);
                Outcome::Failed(extraction_failure(&e))
            }
        }
    }
}
