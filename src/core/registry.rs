//! The fallback orchestrator. Every platform owns an ordered strategy
//! chain; the chain is the retry mechanism, there are no per-strategy
//! retries.

use std::sync::Arc;

use crate::core::ytdlp::YtdlpRunner;
use crate::models::media::{ErrorResult, Outcome, VideoResult};
use crate::platforms::traits::Extractor;
use crate::platforms::{generic, instagram, tiktok, Platform};

pub struct ExtractorRegistry {
    instagram: Vec<Arc<dyn Extractor>>,
    tiktok: Vec<Arc<dyn Extractor>>,
    generic: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new(runner: Arc<YtdlpRunner>) -> anyhow::Result<Self> {
        let generic_ytdlp: Arc<dyn Extractor> =
            Arc::new(generic::GenericYtdlpExtractor::new(runner.clone()));

        Ok(Self {
            instagram: vec![
                Arc::new(instagram::MirrorFetchExtractor::new()?),
                Arc::new(instagram::DirectPageExtractor::new()?),
                Arc::new(instagram::EmbedPageExtractor::new()?),
                Arc::new(instagram::InstagramYtdlpExtractor::new(runner)),
                generic_ytdlp.clone(),
            ],
            tiktok: vec![Arc::new(tiktok::ResolverApiExtractor::new()?)],
            generic: vec![generic_ytdlp],
        })
    }

    fn chain(&self, platform: Platform) -> &[Arc<dyn Extractor>] {
        match platform {
            Platform::Instagram => &self.instagram,
            Platform::TikTok => &self.tiktok,
            _ => &self.generic,
        }
    }

    pub async fn resolve(&self, platform: Platform, url: &str) -> Result<VideoResult, ErrorResult> {
        resolve_chain(self.chain(platform), platform, url).await
    }
}

/// Walks the chain in order. The first strategy yielding a result with a
/// non-empty download URL wins; misses and failures advance the chain. The
/// last failure reason, when one exists, becomes the envelope error on
/// exhaustion.
async fn resolve_chain(
    chain: &[Arc<dyn Extractor>],
    platform: Platform,
    url: &str,
) -> Result<VideoResult, ErrorResult> {
    let mut last_failure: Option<String> = None;

    for strategy in chain {
        match strategy.extract(url, platform).await {
            Outcome::Found(result) if !result.download_url.is_empty() => {
                tracing::info!("{}: resolved via {}", platform.as_str(), strategy.name());
                return Ok(result);
            }
            Outcome::Found(_) => {
                tracing::warn!(
                    "{}: {} returned an empty download URL",
                    platform.as_str(),
                    strategy.name()
                );
            }
            Outcome::Miss => {
                tracing::debug!("{}: {} had no result", platform.as_str(), strategy.name());
            }
            Outcome::Failed(reason) => {
                tracing::warn!("{}: {} failed: {}", platform.as_str(), strategy.name(), reason);
                last_failure = Some(reason);
            }
        }
    }

    let error = last_failure
        .unwrap_or_else(|| format!("{} videosu alinamadi", platform.display_name()));
    Err(ErrorResult::new(platform, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    enum Script {
        Miss,
        Fail(&'static str),
        Find(&'static str),
        FindEmpty,
    }

    struct StubExtractor {
        label: &'static str,
        script: Script,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl StubExtractor {
        fn new(
            label: &'static str,
            script: Script,
            calls: &Arc<Mutex<Vec<&'static str>>>,
        ) -> Arc<dyn Extractor> {
            Arc::new(Self {
                label,
                script,
                calls: calls.clone(),
            })
        }
    }

    #[async_trait]
    impl Extractor for StubExtractor {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn extract(&self, _url: &str, platform: Platform) -> Outcome {
            self.calls.lock().unwrap().push(self.label);
            match self.script {
                Script::Miss => Outcome::Miss,
                Script::Fail(reason) => Outcome::Failed(reason.to_string()),
                Script::Find(url) => {
                    Outcome::Found(VideoResult::bare(platform, "stub", url.to_string()))
                }
                Script::FindEmpty => {
                    Outcome::Found(VideoResult::bare(platform, "stub", String::new()))
                }
            }
        }
    }

    #[tokio::test]
    async fn chain_runs_in_order_until_first_success() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            StubExtractor::new("mirror", Script::Miss, &calls),
            StubExtractor::new("page", Script::Miss, &calls),
            StubExtractor::new("embed", Script::Miss, &calls),
            StubExtractor::new("ig-ytdlp", Script::Fail("Video alinamadi: x"), &calls),
            StubExtractor::new("generic", Script::Find("https://cdn/v.mp4"), &calls),
        ];

        let result = resolve_chain(&chain, Platform::Instagram, "https://www.instagram.com/reel/C1/")
            .await
            .unwrap();

        assert_eq!(result.download_url, "https://cdn/v.mp4");
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["mirror", "page", "embed", "ig-ytdlp", "generic"]
        );
    }

    #[tokio::test]
    async fn first_success_short_circuits_the_chain() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            StubExtractor::new("mirror", Script::Find("https://cdn/mirror.mp4"), &calls),
            StubExtractor::new("page", Script::Find("https://cdn/page.mp4"), &calls),
        ];

        let result = resolve_chain(&chain, Platform::Instagram, "url").await.unwrap();

        assert_eq!(result.download_url, "https://cdn/mirror.mp4");
        assert_eq!(*calls.lock().unwrap(), vec!["mirror"]);
    }

    #[tokio::test]
    async fn empty_download_url_does_not_count_as_success() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            StubExtractor::new("first", Script::FindEmpty, &calls),
            StubExtractor::new("second", Script::Find("https://cdn/real.mp4"), &calls),
        ];

        let result = resolve_chain(&chain, Platform::Instagram, "url").await.unwrap();

        assert_eq!(result.download_url, "https://cdn/real.mp4");
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn exhausted_chain_reports_last_failure_reason() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            StubExtractor::new("first", Script::Miss, &calls),
            StubExtractor::new("second", Script::Fail("Video alinamadi: kaput"), &calls),
        ];

        let failure = resolve_chain(&chain, Platform::Instagram, "url").await.unwrap_err();

        assert!(!failure.success);
        assert_eq!(failure.error, "Video alinamadi: kaput");
        assert_eq!(failure.platform, "instagram");
    }

    #[tokio::test]
    async fn exhausted_chain_without_failures_uses_platform_message() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![StubExtractor::new("resolver", Script::Miss, &calls)];

        let failure = resolve_chain(&chain, Platform::TikTok, "url").await.unwrap_err();

        assert_eq!(failure.error, "Tiktok videosu alinamadi");
        assert_eq!(failure.platform, "tiktok");
        assert!(!failure.error.is_empty());
    }
}
