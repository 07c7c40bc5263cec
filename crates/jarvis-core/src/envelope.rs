use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a command POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub command_label: String,
    #[serde(default)]
    pub data: Value,
}

impl CommandRequest {
    pub fn new(command_label: impl Into<String>, data: Value) -> Self {
        Self {
            command_label: command_label.into(),
            data,
        }
    }

    /// `data`, with `null` read as an empty object.
    pub fn payload(&self) -> Value {
        match &self.data {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        }
    }
}

/// Reply to a command POST: `{status: "success", result}` or
/// `{status: "error", message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CommandReply {
    Success {
        #[serde(default)]
        result: Value,
    },
    Error {
        message: String,
    },
}

impl CommandReply {
    pub fn success(result: Value) -> Self {
        CommandReply::Success { result }
    }

    pub fn error(message: impl Into<String>) -> Self {
        CommandReply::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandReply::Success { .. })
    }
}
