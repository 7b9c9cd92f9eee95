use serde::Serialize;

use crate::platforms::Platform;

/// Successful extraction payload. Field names and shapes are the wire
/// contract clients depend on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoResult {
    pub success: bool,
    pub platform: String,
    pub title: String,
    pub thumbnail: String,
    pub duration: u64,
    pub download_url: String,
    pub qualities: Vec<QualityOption>,
    pub author: String,
}

/// One rung of the quality ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityOption {
    pub quality: String,
    pub url: String,
    pub filesize: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResult {
    pub success: bool,
    pub error: String,
    pub platform: String,
}

impl VideoResult {
    /// Scrape strategies only learn the media URL; everything else stays at
    /// its placeholder value.
    pub fn bare(platform: Platform, title: &str, download_url: String) -> Self {
        Self {
            success: true,
            platform: platform.as_str().to_string(),
            title: title.to_string(),
            thumbnail: String::new(),
            duration: 0,
            download_url,
            qualities: Vec::new(),
            author: String::new(),
        }
    }
}

impl ErrorResult {
    pub fn new(platform: Platform, error: String) -> Self {
        Self {
            success: false,
            error,
            platform: platform.as_str().to_string(),
        }
    }
}

/// Result of a single extraction attempt. A strategy never raises: faults
/// are absorbed and reported through this type so the orchestrator can
/// decide whether to continue the chain.
#[derive(Debug)]
pub enum Outcome {
    Found(VideoResult),
    Miss,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_exact_field_set() {
        let result = VideoResult::bare(Platform::Instagram, "Instagram Reel", "https://cdn/v.mp4".into());
        let value = serde_json::to_value(&result).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["author", "download_url", "duration", "platform", "qualities", "success", "thumbnail", "title"]
        );
        assert_eq!(object["success"], serde_json::json!(true));
        assert_eq!(object["platform"], serde_json::json!("instagram"));
        assert_eq!(object["qualities"], serde_json::json!([]));
    }

    #[test]
    fn failure_envelope_has_exact_field_set() {
        let failure = ErrorResult::new(Platform::TikTok, "Tiktok videosu alinamadi".into());
        let value = serde_json::to_value(&failure).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["error", "platform", "success"]);
        assert_eq!(object["success"], serde_json::json!(false));
        assert_eq!(object["platform"], serde_json::json!("tiktok"));
    }

    #[test]
    fn quality_option_serializes_contract_names() {
        let rung = QualityOption {
            quality: "720p".into(),
            url: "https://cdn/720.mp4".into(),
            filesize: 1024,
        };
        let value = serde_json::to_value(&rung).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"quality": "720p", "url": "https://cdn/720.mp4", "filesize": 1024})
        );
    }
}
