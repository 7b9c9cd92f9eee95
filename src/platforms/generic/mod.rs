//! Generic extraction through the yt-dlp tool. Serves YouTube, Reddit,
//! Vimeo, Twitter, Facebook, Pinterest and Instagram's final fallback.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::ytdlp::{YtdlpOptions, YtdlpRunner};
use crate::models::media::{Outcome, QualityOption, VideoResult};
use crate::platforms::traits::Extractor;
use crate::platforms::{extraction_failure, Platform};

pub struct GenericYtdlpExtractor {
    runner: Arc<YtdlpRunner>,
}

impl GenericYtdlpExtractor {
    pub fn new(runner: Arc<YtdlpRunner>) -> Self {
        Self { runner }
    }
}

/// Builds the quality ladder from MP4 formats with a known height, sorted
/// descending; the highest rung becomes the primary download URL and the
/// ladder is clipped to four entries. Formats without a height only matter
/// when no rung qualifies.
fn parse_generic_info(info: &serde_json::Value, platform: Platform) -> Outcome {
    if info.is_null() {
        return Outcome::Failed("Video bilgisi alinamadi".to_string());
    }

    let formats = info.get("formats").and_then(|v| v.as_array());

    let mut ladder: Vec<(u64, QualityOption)> = Vec::new();
    if let Some(formats) = formats {
        for format in formats {
            if format.get("ext").and_then(|v| v.as_str()) != Some("mp4") {
                continue;
            }
            let url = match format.get("url").and_then(|v| v.as_str()) {
                Some(url) => url,
                None => continue,
            };
            let height = format.get("height").and_then(|v| v.as_u64()).unwrap_or(0);
            if height == 0 {
                continue;
            }

            ladder.push((
                height,
                QualityOption {
                    quality: format!("{}p", height),
                    url: url.to_string(),
                    filesize: format.get("filesize").and_then(|v| v.as_u64()).unwrap_or(0),
                },
            ));
        }
    }

    // Stable sort keeps the original order among equal heights.
    ladder.sort_by(|a, b| b.0.cmp(&a.0));

    let mut download_url = ladder.first().map(|(_, rung)| rung.url.clone());

    if download_url.is_none() {
        download_url = formats
            .and_then(|formats| {
                formats
                    .iter()
                    .find_map(|f| f.get("url").and_then(|v| v.as_str()))
            })
            .map(|url| url.to_string());
    }

    if download_url.is_none() {
        download_url = info.get("url").and_then(|v| v.as_str()).map(|url| url.to_string());
    }

    let download_url = match download_url {
        Some(url) => url,
        None => return Outcome::Failed("Indirme URL bulunamadi".to_string()),
    };

    let mut qualities: Vec<QualityOption> = ladder.into_iter().map(|(_, rung)| rung).collect();
    qualities.truncate(4);

    let fallback_title = format!("{} Video", platform.display_name());

    Outcome::Found(VideoResult {
        success: true,
        platform: platform.as_str().to_string(),
        title: info
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or(&fallback_title)
            .to_string(),
        thumbnail: info
            .get("thumbnail")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        duration: info.get("duration").and_then(|v| v.as_f64()).unwrap_or(0.0) as u64,
        download_url,
        qualities,
        author: info
            .get("uploader")
            .and_then(|v| v.as_str())
            .or_else(|| info.get("channel").and_then(|v| v.as_str()))
            .unwrap_or_default()
            .to_string(),
    })
}

#[async_trait]
impl Extractor for GenericYtdlpExtractor {
    fn name(&self) -> &'static str {
        "generic-ytdlp"
    }

    async fn extract(&self, url: &str, platform: Platform) -> Outcome {
        tracing::debug!("{}: running generic extraction", platform.as_str());

        match self.runner.fetch_info(url, &YtdlpOptions::generic()).await {
            Ok(info) => parse_generic_info(&info, platform),
            Err(e) => {
                tracing::warn!("{} yt-dlp error: {}", platform.as_str(), e);
                Outcome::Failed(extraction_failure(&e))
            }
        }
    }
}
