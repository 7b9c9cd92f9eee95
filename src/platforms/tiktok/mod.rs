//! TikTok extraction via the third-party resolver API. The resolver does
//! the heavy lifting; this strategy posts the URL and reads the nested
//! payload back.

use std::time::Duration;

use async_trait::async_trait;

use crate::core::http_client;
use crate::models::media::{Outcome, VideoResult};
use crate::platforms::traits::Extractor;
use crate::platforms::Platform;

const RESOLVER_ENDPOINT: &str = "https://www.tikwm.com/api/";
const RESOLVER_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ResolverApiExtractor {
    client: reqwest::Client,
}

impl ResolverApiExtractor {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client::build_client(http_client::DESKTOP_UA, RESOLVER_TIMEOUT)?,
        })
    }
}

/// `code == 0` plus a `data` object marks success. The HD play URL wins
/// over the standard one; empty strings count as absent.
fn parse_resolver_payload(payload: &serde_json::Value) -> Outcome {
    if payload.get("code").and_then(|v| v.as_i64()) != Some(0) {
        return Outcome::Miss;
    }

    let data = match payload.get("data") {
        Some(data) if !data.is_null() => data,
        _ => return Outcome::Miss,
    };

    let download_url = data
        .get("hdplay")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            data.get("play")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
        });

    let download_url = match download_url {
        Some(url) => url.to_string(),
        None => return Outcome::Miss,
    };

    Outcome::Found(VideoResult {
        success: true,
        platform: Platform::TikTok.as_str().to_string(),
        title: data
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("TikTok Video")
            .to_string(),
        thumbnail: data
            .get("cover")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        duration: data.get("duration").and_then(|v| v.as_u64()).unwrap_or(0),
        download_url,
        qualities: Vec::new(),
        author: data
            .pointer("/author/nickname")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
    })
}

#[async_trait]
impl Extractor for ResolverApiExtractor {
    fn name(&self) -> &'static str {
        "tiktok-resolver"
    }

    async fn extract(&self, url: &str, _platform: Platform) -> Outcome {
        tracing::debug!("tiktok: querying resolver API");

        let response = match self
            .client
            .post(RESOLVER_ENDPOINT)
            .form(&[("url", url), ("hd", "1")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("tiktok resolver error: {}", e);
                return Outcome::Miss;
            }
        };

        if !response.status().is_success() {
            return Outcome::Miss;
        }

        let payload: serde_json::Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("tiktok resolver payload error: {}", e);
                return Outcome::Miss;
            }
        };

        parse_resolver_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolver_payload_maps_to_result() {
        let payload = json!({
            "code": 0,
            "data": {
                "hdplay": "https://x/hd.mp4",
                "play": "https://x/sd.mp4",
                "title": "T",
                "cover": "https://x/c.jpg",
                "duration": 12,
                "author": {"nickname": "A"}
            }
        });

        match parse_resolver_payload(&payload) {
            Outcome::Found(result) => {
                assert_eq!(
                    result,
                    VideoResult {
                        success: true,
                        platform: "tiktok".to_string(),
                        title: "T".to_string(),
                        thumbnail: "https://x/c.jpg".to_string(),
                        duration: 12,
                        download_url: "https://x/hd.mp4".to_string(),
                        qualities: Vec::new(),
                        author: "A".to_string(),
                    }
                );
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn resolver_falls_back_to_standard_play_url() {
        let payload = json!({
            "code": 0,
            "data": {"hdplay": "", "play": "https://x/sd.mp4"}
        });

        match parse_resolver_payload(&payload) {
            Outcome::Found(result) => {
                assert_eq!(result.download_url, "https://x/sd.mp4");
                assert_eq!(result.title, "TikTok Video");
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn resolver_error_code_is_a_miss() {
        let payload = json!({"code": -1, "msg": "url invalid"});
        assert!(matches!(parse_resolver_payload(&payload), Outcome::Miss));
    }

    #[test]
    fn resolver_without_play_urls_is_a_miss() {
        let payload = json!({"code": 0, "data": {"title": "T"}});
        assert!(matches!(parse_resolver_payload(&payload), Outcome::Miss));
    }

    #[test]
    fn resolver_null_data_is_a_miss() {
        let payload = json!({"code": 0, "data": null});
        assert!(matches!(parse_resolver_payload(&payload), Outcome::Miss));
    }
}
