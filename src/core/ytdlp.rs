//! Invocation of the external yt-dlp extractor. The tool is treated as an
//! opaque collaborator: a URL and an options bag go in, one JSON document
//! comes out.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::anyhow;
use tokio::sync::Semaphore;

/// Options forwarded to the extractor per strategy.
pub struct YtdlpOptions {
    pub user_agent: &'static str,
    pub format: &'static str,
    pub socket_timeout: u32,
    pub retries: u32,
    pub extractor_args: Option<&'static str>,
}

impl YtdlpOptions {
    /// Instagram-tuned run: app user-agent and DASH manifests skipped.
    pub fn instagram() -> Self {
        Self {
            user_agent: crate::core::http_client::INSTAGRAM_APP_UA,
            format: "best[ext=mp4]/best",
            socket_timeout: 30,
            retries: 3,
            extractor_args: Some("instagram:skip=dash"),
        }
    }

    pub fn generic() -> Self {
        Self {
            user_agent: crate::core::http_client::MOBILE_WEBKIT_UA,
            format: "best[ext=mp4]/best",
            socket_timeout: 30,
            retries: 3,
            extractor_args: None,
        }
    }
}

/// Locates and runs the yt-dlp binary. The semaphore caps how many
/// subprocesses run at once so a burst of requests cannot fork-bomb the
/// host; waiting requests queue on the permit.
pub struct YtdlpRunner {
    bin: Option<PathBuf>,
    permits: Semaphore,
}

impl YtdlpRunner {
    pub async fn locate(override_path: Option<PathBuf>, max_concurrent: usize) -> Self {
        let bin = resolve_binary(override_path).await;
        match &bin {
            Some(path) => tracing::info!("yt-dlp available at {}", path.display()),
            None => tracing::warn!("yt-dlp not found; extractor-based strategies will fail"),
        }

        Self {
            bin,
            permits: Semaphore::new(max_concurrent),
        }
    }

    pub async fn fetch_info(&self, url: &str, opts: &YtdlpOptions) -> anyhow::Result<serde_json::Value> {
        let bin = self
            .bin
            .as_ref()
            .ok_or_else(|| anyhow!("yt-dlp binary not available"))?;

        let _permit = self.permits.acquire().await?;

        let mut command = tokio::process::Command::new(bin);
        command
            .args(["--dump-json", "--no-warnings", "--no-playlist"])
            .args(["--format", opts.format])
            .args(["--user-agent", opts.user_agent])
            .args(["--socket-timeout", &opts.socket_timeout.to_string()])
            .args(["--retries", &opts.retries.to_string()]);

        if let Some(extractor_args) = opts.extractor_args {
            command.args(["--extractor-args", extractor_args]);
        }

        let output = command
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| anyhow!("failed to run yt-dlp: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("yt-dlp failed: {}", stderr.trim()));
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| anyhow!("yt-dlp returned invalid JSON: {}", e))?;

        Ok(info)
    }
}

async fn resolve_binary(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if probe(&path).await {
            return Some(path);
        }
        tracing::warn!("configured yt-dlp at {} is not runnable", path.display());
    }

    let on_path = PathBuf::from("yt-dlp");
    if probe(&on_path).await {
        return Some(on_path);
    }

    None
}

async fn probe(path: &Path) -> bool {
    tokio::process::Command::new(path)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}
