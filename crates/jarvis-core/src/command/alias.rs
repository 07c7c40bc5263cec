use super::builtin::RUN_CUSTOM_COMMAND;
use super::CommandRegistry;
use crate::entity::{self, COMMANDS};
use crate::error::{JarvisError, Result};
use crate::table::{Cell, TableStorage, TableStore};
use serde::Serialize;
use serde_json::Value;

pub const LABEL_FIELD: &str = "Mapped Command Label";
pub const PAYLOAD_FIELD: &str = "Preset Payload JSON";

/// A resolved row of the custom command table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alias {
    pub alias: String,
    pub label: String,
    pub payload: Value,
}

/// Look up `alias` and parse its preset payload.
pub fn resolve(storage: &dyn TableStorage, alias: &str) -> Result<Alias> {
    let spec = entity::find(COMMANDS)?;
    let record = TableStore::new(storage, &spec)
        .get_by_key(&Cell::from(alias))?
        .ok_or_else(|| JarvisError::AliasNotFound(alias.to_string()))?;

    let label = record.text(LABEL_FIELD).trim().to_string();
    if label == RUN_CUSTOM_COMMAND {
        return Err(JarvisError::InvalidPayload(format!(
            "alias \"{alias}\" may not map to {RUN_CUSTOM_COMMAND}"
        )));
    }

    let payload = serde_json::from_str(&record.text(PAYLOAD_FIELD)).map_err(|e| {
        JarvisError::InvalidPayload(format!("invalid JSON in payload for \"{alias}\": {e}"))
    })?;

    Ok(Alias {
        alias: alias.to_string(),
        label,
        payload,
    })
}

/// Run the command an alias points at with its preset payload.
pub fn run_alias(registry: &CommandRegistry, storage: &dyn TableStorage, alias: &str) -> Result<Value> {
    let resolved = resolve(storage, alias)?;
    tracing::info!(alias, command = %resolved.label, "running alias");
    registry.dispatch(storage, &resolved.label, resolved.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::default_registry;
    use crate::table::MemoryStorage;
    use serde_json::json;

    fn setup() -> (MemoryStorage, CommandRegistry) {
        let storage = MemoryStorage::new();
        entity::ensure_tables(&storage).unwrap();
        let reg = default_registry();
        (storage, reg)
    }

    fn add_alias(reg: &CommandRegistry, storage: &MemoryStorage, alias: &str, label: &str, payload: &str) {
        reg.dispatch(
            storage,
            "commands.add",
            json!({
                "Command Alias": alias,
                "Mapped Command Label": label,
                "Preset Payload JSON": payload,
            }),
        )
        .unwrap();
    }

    #[test]
    fn alias_dispatches_preset_payload() {
        let (storage, reg) = setup();
        add_alias(
            &reg,
            &storage,
            "Save SSP Tone",
            "tones.add",
            r#"{"Tone ID": "SSP", "Tone Name": "Steady"}"#,
        );

        let out = run_alias(&reg, &storage, "Save SSP Tone").unwrap();
        assert_eq!(out["key"], json!("SSP"));
    }

    #[test]
    fn alias_runs_through_registry_command() {
        let (storage, reg) = setup();
        add_alias(&reg, &storage, "log", "addProtocolEntry", r#"{"Rule ID": "R-1"}"#);
        let out = reg
            .dispatch(&storage, RUN_CUSTOM_COMMAND, json!({ "alias": "log" }))
            .unwrap();
        assert_eq!(out, json!("✅ Protocol logged: R-1"));
    }

    #[test]
    fn bad_json_names_the_alias() {
        let (storage, reg) = setup();
        add_alias(&reg, &storage, "broken", "tones.add", "{not json");
        let err = run_alias(&reg, &storage, "broken").unwrap_err();
        match err {
            JarvisError::InvalidPayload(msg) => assert!(msg.contains("\"broken\""), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_alias() {
        let (storage, reg) = setup();
        assert!(matches!(
            run_alias(&reg, &storage, "ghost"),
            Err(JarvisError::AliasNotFound(_))
        ));
    }

    #[test]
    fn alias_cannot_recurse() {
        let (storage, reg) = setup();
        add_alias(&reg, &storage, "loop", RUN_CUSTOM_COMMAND, r#"{"alias": "loop"}"#);
        assert!(matches!(
            run_alias(&reg, &storage, "loop"),
            Err(JarvisError::InvalidPayload(_))
        ));
    }
}
