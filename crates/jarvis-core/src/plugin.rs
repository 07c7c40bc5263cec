//! Documents served on the read side of the transport: the health check,
//! the AI plugin manifest and the OpenAPI description.

use crate::config::PluginConfig;
use crate::error::Result;
use serde_json::{json, Value};

pub const HEALTH_TEXT: &str = "Web app is working!";
pub const NOT_FOUND_TEXT: &str = "Not found";

pub const MANIFEST_PATH: &str = ".well-known/ai-plugin.json";
pub const OPENAPI_PATH: &str = "openapi.yaml";
pub const HEALTH_PATH: &str = "test";

/// What a `?path=` value on the read endpoint selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginDoc {
    Health,
    Manifest,
    OpenApi,
    NotFound,
}

impl PluginDoc {
    pub fn from_path(path: &str) -> Self {
        match path.trim_start_matches('/') {
            HEALTH_PATH => PluginDoc::Health,
            MANIFEST_PATH => PluginDoc::Manifest,
            OPENAPI_PATH => PluginDoc::OpenApi,
            _ => PluginDoc::NotFound,
        }
    }
}

/// AI plugin manifest advertising the OpenAPI document under `base_url`.
pub fn manifest(cfg: &PluginConfig, base_url: &str) -> Value {
    json!({
        "schema_version": "v1",
        "name_for_human": cfg.name_for_human,
        "name_for_model": cfg.name_for_model,
        "description_for_human": cfg.description_for_human,
        "description_for_model": cfg.description_for_model,
        "auth": { "type": "none" },
        "api": {
            "type": "openapi",
            "url": format!("{base_url}?path={OPENAPI_PATH}"),
        },
        "logo_url": cfg.logo_url,
        "contact_email": cfg.contact_email,
        "legal_info_url": cfg.legal_info_url,
    })
}

/// OpenAPI 3.1 description of the write endpoint, rendered as YAML.
/// `commands` populates the `commandLabel` enum.
pub fn openapi(cfg: &PluginConfig, base_url: &str, commands: &[&str]) -> Result<String> {
    let doc = json!({
        "openapi": "3.1.0",
        "info": {
            "title": cfg.name_for_human,
            "description": cfg.description_for_human,
            "version": "1.0.0",
        },
        "servers": [{ "url": base_url }],
        "paths": {
            "/": {
                "post": {
                    "summary": "Execute a KeithOS command",
                    "operationId": "executeCommand",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "required": ["commandLabel"],
                                    "properties": {
                                        "commandLabel": {
                                            "type": "string",
                                            "description": "Command type (e.g., 'addProtocolEntry')",
                                            "enum": commands,
                                        },
                                        "data": {
                                            "type": "object",
                                            "description": "Associated payload",
                                        },
                                    },
                                },
                            },
                        },
                    },
                    "responses": {
                        "200": {
                            "description": "Success",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Envelope" },
                                },
                            },
                        },
                    },
                },
            },
        },
        "components": {
            "schemas": {
                "Envelope": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "string", "enum": ["success", "error"] },
                        "result": { "description": "Command result when status is success" },
                        "message": { "type": "string", "description": "Error message when status is error" },
                    },
                },
            },
        },
    });
    Ok(serde_yaml::to_string(&doc)?)
}
