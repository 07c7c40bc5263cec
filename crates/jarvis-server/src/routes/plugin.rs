use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jarvis_core::plugin::{self, PluginDoc};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DocQuery {
    #[serde(default)]
    pub path: String,
}

/// GET /?path=...: health check, manifest or OpenAPI document.
pub async fn get_doc(
    State(app): State<AppState>,
    Query(query): Query<DocQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    match PluginDoc::from_path(&query.path) {
        PluginDoc::Health => Ok(plugin::HEALTH_TEXT.into_response()),
        PluginDoc::Manifest => Ok(manifest(State(app), headers).await.into_response()),
        PluginDoc::OpenApi => openapi(State(app), headers).await,
        PluginDoc::NotFound => Ok((StatusCode::NOT_FOUND, plugin::NOT_FOUND_TEXT).into_response()),
    }
}

/// GET /.well-known/ai-plugin.json
pub async fn manifest(State(app): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    let base = base_url(&app, &headers);
    Json(plugin::manifest(&app.config.plugin, &base))
}

/// GET /openapi.yaml
pub async fn openapi(State(app): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let base = base_url(&app, &headers);
    let names = app.registry.names();
    let yaml = plugin::openapi(&app.config.plugin, &base, &names)?;
    Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response())
}

/// Configured public URL, else `http://<Host>` of the request.
fn base_url(app: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &app.config.server.public_url {
        return url.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}
