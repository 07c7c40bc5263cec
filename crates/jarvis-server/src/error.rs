use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jarvis_core::envelope::CommandReply;
use jarvis_core::error::JarvisError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
///
/// Every error renders as the `{status: "error", message}` envelope; only the
/// HTTP status varies with the error kind.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<JarvisError>() {
            Some(e) => status_for(e),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn status_for(e: &JarvisError) -> StatusCode {
    match e {
        JarvisError::InvalidPayload(_)
        | JarvisError::MissingKey { .. }
        | JarvisError::NoFallbackPayload(_)
        | JarvisError::InvalidTableName(_)
        | JarvisError::UnknownPreset(_)
        | JarvisError::NotInitialized => StatusCode::BAD_REQUEST,
        JarvisError::UnknownCommand(_)
        | JarvisError::UnknownEntity(_)
        | JarvisError::TableNotFound(_)
        | JarvisError::HeaderNotFound { .. }
        | JarvisError::AliasNotFound(_)
        | JarvisError::RowOutOfRange { .. } => StatusCode::NOT_FOUND,
        JarvisError::DuplicateKey { .. } => StatusCode::CONFLICT,
        JarvisError::RelayNotConfigured
        | JarvisError::RelayReply { .. }
        | JarvisError::MissingApiKey
        | JarvisError::Llm(_)
        | JarvisError::StorageLock
        | JarvisError::MutationSkipped(_)
        | JarvisError::Http(_)
        | JarvisError::Io(_)
        | JarvisError::Yaml(_)
        | JarvisError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "command failed");
        } else {
            tracing::warn!(error = %self.0, "command rejected");
        }
        let body = CommandReply::error(self.0.to_string());
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
