//! Attribute write endpoint
//!
//! `POST /api/{api_key}/attributes/{id}` with a `{"key": u16, "value": u8}`
//! body. A `["success"]` reply means the write was queued for the device,
//! not that the device confirmed it; `["failure"]` with status 200 means the
//! transport refused it.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{BytesRejection, PathRejection},
    },
    http::Uri,
    middleware,
    routing::post,
};

use super::{ApiState, auth};
use crate::attributes::{ApiError, WriteResponse};

/// Build attribute routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/{api_key}/attributes/{id}", post(write_attribute))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .with_state(state)
}

/// Write one attribute on the device named by `id`
///
/// Extractor rejections (undecodable id, unreadable or oversized body) are
/// answered in the same error vocabulary as the pipeline.
async fn write_attribute(
    State(state): State<Arc<ApiState>>,
    uri: Uri,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> WriteResponse {
    let id = match path {
        Ok(Path((_api_key, id))) => id,
        Err(rejection) => {
            let raw_id = uri.path().rsplit('/').next().unwrap_or_default();
            tracing::warn!(id = raw_id, error = %rejection, "undecodable device id");
            return WriteResponse::error(ApiError::not_found(raw_id), state.writer.policy());
        }
    };

    match body {
        Ok(body) => state.writer.write(&id, &body),
        Err(rejection) => {
            tracing::warn!(device_id = %id, error = %rejection, "request body rejected");
            WriteResponse::error(ApiError::invalid_json(&id), state.writer.policy())
        }
    }
}
