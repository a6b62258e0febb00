//! Clip extraction and tool health routes.

use crate::clip::{ClipError, ClipPayload, REQUIRED_FIELDS_MESSAGE};
use crate::server::AppContext;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

pub fn clip_routes() -> Router<AppContext> {
    Router::new()
        .route("/clip", get(tool_health).post(create_clip))
        .route("/clip-video", get(tool_health).post(create_clip))
        .route("/health", get(tool_health))
}

/// Error body returned for every failed clip request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ClipError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

async fn tool_health(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.clipper.health().await)
}

async fn create_clip(
    State(ctx): State<AppContext>,
    payload: Result<Json<ClipPayload>, JsonRejection>,
) -> Result<Response, ClipError> {
    let Json(payload) = payload.map_err(|rejection| {
        ClipError::invalid_request(REQUIRED_FIELDS_MESSAGE).with_details(rejection.body_text())
    })?;

    let output = ctx.clipper.extract(payload.into_request()).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, output.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", output.filename),
        )
        .header(header::CONTENT_LENGTH, output.byte_size().to_string())
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(output.bytes))
        .map_err(|e| ClipError::internal("Internal server error").with_details(e.to_string()))
}
