use std::sync::Arc;

pub mod config;
pub mod core;
pub mod models;
pub mod platforms;
pub mod server;

use crate::core::registry::ExtractorRegistry;
use crate::core::ytdlp::YtdlpRunner;

pub struct AppState {
    pub registry: ExtractorRegistry,
}

impl AppState {
    pub async fn new(config: &config::Config) -> anyhow::Result<Self> {
        let runner = Arc::new(
            YtdlpRunner::locate(config.ytdlp_path.clone(), config.ytdlp_concurrency).await,
        );

        Ok(Self {
            registry: ExtractorRegistry::new(runner)?,
        })
    }
}
