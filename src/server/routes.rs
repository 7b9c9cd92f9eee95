/// Route handlers for the video resolver API.
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platforms::Platform;
use crate::AppState;

// ====== REQUEST / RESPONSE TYPES ======

#[derive(Deserialize)]
pub struct VideoQuery {
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct VideoBody {
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub platforms: &'static [&'static str],
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

/// Client input errors. Everything past input validation is reported inside
/// the 200 envelope so clients only ever inspect `success`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("URL gerekli")]
    MissingUrl,
    #[error("Desteklenmeyen platform")]
    UnsupportedPlatform,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDetail {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ====== HANDLERS ======

/// GET /
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "ok",
        service: "Pockify Video API",
        version: env!("CARGO_PKG_VERSION"),
        platforms: &[
            "youtube",
            "instagram",
            "tiktok",
            "twitter",
            "facebook",
            "reddit",
            "vimeo",
        ],
    })
}

/// GET /health
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}

/// GET /api/video?url=...
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoQuery>,
) -> Result<Response, ApiError> {
    fetch_video(&state, query.url.as_deref()).await
}

/// POST /api/video with body {"url": ...}
pub async fn post_video(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VideoBody>,
) -> Result<Response, ApiError> {
    fetch_video(&state, body.url.as_deref()).await
}

async fn fetch_video(state: &AppState, url: Option<&str>) -> Result<Response, ApiError> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    let platform = Platform::detect(url);
    if platform == Platform::Unknown {
        return Err(ApiError::UnsupportedPlatform);
    }

    tracing::info!("resolving {} url", platform.as_str());

    // Orchestration failures deliberately stay HTTP 200; only input
    // validation produces an error status.
    match state.registry.resolve(platform, url).await {
        Ok(result) => Ok(Json(result).into_response()),
        Err(failure) => Ok(Json(failure).into_response()),
    }
}
