//! HTTP API: `GET /api/combinations` and `GET /health`.

use crate::adapters::build_source;
use crate::api::views::{to_views, CombinationView};
use crate::config::toml_config::{AppConfig, SourceKind};
use crate::core::service::ComboService;
use crate::domain::model::VideoFilters;
use crate::domain::ports::VideoSource;
use crate::utils::duration::parse_target;
use crate::utils::error::AppError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

type DynService = ComboService<Box<dyn VideoSource>>;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    services: Arc<HashMap<SourceKind, Arc<DynService>>>,
    default_source: SourceKind,
    default_attempts: usize,
}

impl AppState {
    pub fn new(default_source: SourceKind, default_attempts: usize) -> Self {
        Self {
            services: Arc::new(HashMap::new()),
            default_source,
            default_attempts,
        }
    }

    pub fn with_service(mut self, kind: SourceKind, service: DynService) -> Self {
        Arc::make_mut(&mut self.services).insert(kind, Arc::new(service));
        self
    }

    /// Builds one service per source that can be constructed from `config`.
    /// A YouTube source without credentials is skipped; requests for it get
    /// a 500 with a hint.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut state = Self::new(config.source.kind, config.selection.attempts);

        for kind in [SourceKind::Memory, SourceKind::Catalog, SourceKind::YouTube] {
            match build_source(kind, &config.source) {
                Ok(source) => {
                    let service = ComboService::new(source)
                        .with_min_remaining(config.selection.min_remaining)
                        .with_max_attempts(config.selection.max_attempts)
                        .with_seed(config.selection.seed)
                        .with_parallel(config.selection.parallel);
                    state = state.with_service(kind, service);
                }
                Err(e) => tracing::warn!("{} source unavailable: {}", kind, e),
            }
        }

        state
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CombinationsQuery {
    /// Minutes (`30`) or clock notation (`1:30:00`, `45:00`).
    pub duration: Option<String>,
    pub attempts: Option<String>,
    pub source: Option<String>,
    pub use_youtube: Option<bool>,
    pub use_database: Option<bool>,
    pub max_results: Option<usize>,
    pub order: Option<String>,
    pub max_duration: Option<i64>,
    pub min_likes: Option<u64>,
    pub min_views: Option<u64>,
}

impl CombinationsQuery {
    fn source_kind(&self, default: SourceKind) -> Result<SourceKind, ApiError> {
        if let Some(source) = &self.source {
            return source
                .parse()
                .map_err(|e: AppError| ApiError::BadRequest(e.to_string()));
        }
        if self.use_database == Some(true) {
            return Ok(SourceKind::Catalog);
        }
        if self.use_youtube == Some(true) {
            return Ok(SourceKind::YouTube);
        }
        Ok(default)
    }

    fn filters(&self) -> VideoFilters {
        VideoFilters {
            max_results: self.max_results,
            order: self.order.clone(),
            max_duration: self.max_duration,
            min_likes: self.min_likes,
            min_views: self.min_views,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    SourceUnavailable(SourceKind),
    Internal(AppError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::SourceUnavailable(SourceKind::YouTube) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "YouTube API key or channel id is not configured",
                    "hint": "Set YOUTUBE_API_KEY and YOUTUBE_CHANNEL_ID or the [source.youtube] section of the config file",
                }),
            ),
            ApiError::SourceUnavailable(kind) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("{} source is not available", kind) }),
            ),
            ApiError::Internal(err) => {
                tracing::error!("Request failed: {} (category: {:?})", err, err.category());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": err.user_friendly_message() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub async fn get_combinations(
    State(state): State<AppState>,
    Query(params): Query<CombinationsQuery>,
) -> Result<Json<Vec<CombinationView>>, ApiError> {
    let duration = params
        .duration
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("duration is required".to_string()))?;
    let target = parse_target(duration)?;

    let attempts = match params.attempts.as_deref() {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ApiError::BadRequest(format!("attempts must be a positive integer, got '{}'", raw)))?,
        None => state.default_attempts,
    };

    let kind = params.source_kind(state.default_source)?;
    let service = state
        .services
        .get(&kind)
        .cloned()
        .ok_or(ApiError::SourceUnavailable(kind))?;

    tracing::info!(
        "Combinations request: target={}s attempts={} source={}",
        target,
        attempts,
        kind
    );

    let combinations = service
        .combinations(target, attempts, &params.filters())
        .await?;

    Ok(Json(to_views(&combinations)))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/combinations", get(get_combinations))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
