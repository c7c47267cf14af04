//! API key authentication middleware
//!
//! REST clients carry their key as the second path segment
//! (`/api/{api_key}/...`), not in a header.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::ApiState;
use crate::attributes::{ApiError, WriteResponse};

/// Extract the API key segment from `/api/{api_key}/...`
fn extract_api_key(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some("api"), Some(key)) if !key.is_empty() => Some(key),
        _ => None,
    }
}

/// Resource address reported in the error, the path after the key
fn resource_address(path: &str) -> String {
    let rest: Vec<&str> = path.trim_start_matches('/').split('/').skip(2).collect();
    format!("/{}", rest.join("/"))
}

/// Middleware to verify the path API key
pub async fn require_api_key(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Response {
    // If no API keys configured, allow all requests (development mode)
    if state.api_keys.is_empty() {
        return next.run(req).await;
    }

    let path = req.uri().path().to_string();
    match extract_api_key(&path) {
        Some(key) if state.api_keys.iter().any(|k| k == key) => next.run(req).await,
        provided => {
            if provided.is_some() {
                tracing::warn!("invalid API key provided");
            } else {
                tracing::debug!("no API key provided");
            }
            WriteResponse::error(
                ApiError::unauthorized(&resource_address(&path)),
                state.writer.policy(),
            )
            .into_response()
        }
    }
}
