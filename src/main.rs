use std::sync::Arc;

use tracing::info;

use pockify_video_api::config::Config;
use pockify_video_api::{server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pockify_video_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();
    let state = Arc::new(AppState::new(&config).await?);
    let app = server::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Pockify Video API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
