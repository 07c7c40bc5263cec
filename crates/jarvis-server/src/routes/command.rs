use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use jarvis_core::envelope::{CommandReply, CommandRequest};
use jarvis_core::error::JarvisError;

use crate::error::AppError;
use crate::state::AppState;

/// POST /: execute `{commandLabel, data}` and answer with the envelope.
///
/// The body is parsed by hand so malformed JSON gets the envelope too,
/// not axum's plain-text rejection.
pub async fn execute(State(app): State<AppState>, body: Bytes) -> Result<Json<CommandReply>, AppError> {
    let req: CommandRequest = serde_json::from_slice(&body)
        .map_err(|e| JarvisError::InvalidPayload(format!("invalid request body: {e}")))?;
    let label = req.command_label.clone();

    let result = tokio::task::spawn_blocking(move || {
        let _guard = app.exec_lock.lock().map_err(|_| JarvisError::StorageLock)?;
        app.registry
            .dispatch(app.storage.as_ref(), &req.command_label, req.payload())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!(command = %label, "command executed");
    Ok(Json(CommandReply::success(result)))
}
