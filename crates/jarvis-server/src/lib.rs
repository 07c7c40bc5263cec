pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use jarvis_core::command::default_registry;
use jarvis_core::config::Config;
use jarvis_core::table::WorkbookStorage;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router for the plugin surface.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/",
            get(routes::plugin::get_doc).post(routes::command::execute),
        )
        .route("/.well-known/ai-plugin.json", get(routes::plugin::manifest))
        .route("/openapi.yaml", get(routes::plugin::openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// State for the workbook at `root`: its tables, its config and the default
/// command registry.
pub fn state_for_root(root: &Path) -> anyhow::Result<AppState> {
    let storage = WorkbookStorage::open(root)?;
    let config = Config::load_or_default(root)?;
    for warning in config.validate() {
        tracing::warn!(level = ?warning.level, "{}", warning.message);
    }
    Ok(AppState::new(Arc::new(storage), default_registry(), config))
}

/// Start the plugin server.
pub async fn serve(root: &Path, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the plugin server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: &Path,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(state_for_root(root)?);

    tracing::info!("jarvis plugin server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/?path=test");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
