use thiserror::Error;

#[derive(Debug, Error)]
pub enum JarvisError {
    #[error("not initialized: run 'jarvis init'")]
    NotInitialized,

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("header \"{header}\" not found in \"{table}\"")]
    HeaderNotFound { table: String, header: String },

    #[error("invalid table name '{0}': use letters, digits, '_' or '-'")]
    InvalidTableName(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{field} \"{key}\" already exists in {table}")]
    DuplicateKey {
        table: String,
        field: String,
        key: String,
    },

    #[error("'{field}' is required for {table}")]
    MissingKey { table: String, field: String },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("row {row} is out of range for {table}")]
    RowOutOfRange { table: String, row: usize },

    #[error("command alias \"{0}\" not found")]
    AliasNotFound(String),

    #[error("no payload available for command: {0}")]
    NoFallbackPayload(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("relay URL not configured: run 'jarvis relay set' first")]
    RelayNotConfigured,

    #[error("relay returned an unreadable reply (HTTP {status}): {body}")]
    RelayReply { status: u16, body: String },

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("storage lock poisoned")]
    StorageLock,

    #[error("storage skipped mutation of {0}")]
    MutationSkipped(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JarvisError>;
