// Shared HTTP response types and the static client bundle.

use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    // Human-readable error string for consistent JSON error responses.
    pub error: String,
}

impl ErrorResponse {
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_asset(&state.static_dir, "index.html").await
}

pub async fn asset_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    serve_asset(&state.static_dir, &path).await
}

async fn serve_asset(root: &FsPath, requested: &str) -> Response {
    let Some(path) = resolve_asset_path(root, requested) else {
        return not_found();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return not_found(),
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read asset");
            ErrorResponse {
                error: "failed to read asset".to_string(),
            }
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn not_found() -> Response {
    ErrorResponse {
        error: "not found".to_string(),
    }
    .into_response_with(StatusCode::NOT_FOUND)
}

/// Join a request path onto the asset root. Anything but plain segments (`..`, roots,
/// prefixes) is refused so requests cannot escape the root.
fn resolve_asset_path(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut segments = 0;
    for component in FsPath::new(requested).components() {
        match component {
            Component::Normal(segment) => {
                resolved.push(segment);
                segments += 1;
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    (segments > 0).then_some(resolved)
}

fn content_type(path: &FsPath) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
