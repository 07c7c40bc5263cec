use super::{alias, CommandRegistry, Ctx};
use crate::entity::{self, EntitySpec};
use crate::error::{JarvisError, Result};
use crate::table::{Cell, Record, TableStore};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const ADD_PROTOCOL_ENTRY: &str = "addProtocolEntry";
pub const LOG_PLAYBOOK_ENTRY: &str = "logPlaybookEntry";
pub const UPDATE_AGENT_STATUS: &str = "updateAgentStatus";
pub const RUN_CUSTOM_COMMAND: &str = "runCustomCommand";

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct KeyInput {
    pub key: Cell,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInput {
    pub key: Cell,
    pub fields: Record,
}

#[derive(Debug, Deserialize)]
pub struct RowInput {
    pub row: usize,
}

#[derive(Debug, Deserialize)]
pub struct RowUpdateInput {
    pub row: usize,
    pub fields: Record,
}

#[derive(Debug, Deserialize)]
pub struct AliasInput {
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct Added {
    pub key: String,
    pub record: Record,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry with `<entity>.<op>` commands for every catalogue entity plus the
/// legacy labels and `runCustomCommand`.
pub fn default_registry() -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    for spec in entity::builtins() {
        register_entity(&mut reg, spec.clone());
        match spec.name {
            entity::PLAYBOOK => register_protocol_labels(&mut reg, spec.clone()),
            entity::AGENTS => register_agent_status(&mut reg, spec.clone()),
            _ => {}
        }
    }

    reg.register(RUN_CUSTOM_COMMAND, |ctx, input: AliasInput| {
        alias::run_alias(ctx.registry, ctx.storage, &input.alias)
    });

    reg
}

fn register_protocol_labels(reg: &mut CommandRegistry, playbook: Arc<EntitySpec>) {
    for label in [ADD_PROTOCOL_ENTRY, LOG_PLAYBOOK_ENTRY] {
        let spec = playbook.clone();
        reg.register(label, move |ctx, record: Record| {
            let stored = TableStore::new(ctx.storage, &spec).add(record)?;
            Ok(format!("✅ Protocol logged: {}", stored.text(spec.key_field)))
        });
    }
}

/// `updateAgentStatus` takes a flat agent record and updates the row named by
/// its `Agent Name`.
fn register_agent_status(reg: &mut CommandRegistry, agents: Arc<EntitySpec>) {
    reg.register(UPDATE_AGENT_STATUS, move |ctx, record: Record| {
        let key = match record.get(agents.key_field) {
            Some(cell) if !cell.is_empty() => cell.clone(),
            _ => {
                return Err(JarvisError::MissingKey {
                    table: agents.table.to_string(),
                    field: agents.key_field.to_string(),
                })
            }
        };
        let fields: Record = record
            .iter()
            .filter(|(field, _)| *field != agents.key_field)
            .map(|(field, cell)| (field, cell.clone()))
            .collect();
        let updated = TableStore::new(ctx.storage, &agents).update_by_key(&key, fields)?;
        Ok(Updated { updated })
    });
}

fn register_entity(reg: &mut CommandRegistry, spec: Arc<EntitySpec>) {
    let name = spec.name;

    let s = spec.clone();
    reg.register(format!("{name}.add"), move |ctx, record: Record| {
        let record = TableStore::new(ctx.storage, &s).add(record)?;
        Ok(Added {
            key: record.text(s.key_field),
            record,
        })
    });

    let s = spec.clone();
    reg.register(format!("{name}.get"), move |ctx, input: KeyInput| {
        TableStore::new(ctx.storage, &s).get_by_key(&input.key)
    });

    let s = spec.clone();
    reg.register(format!("{name}.update"), move |ctx, input: UpdateInput| {
        let updated = TableStore::new(ctx.storage, &s).update_by_key(&input.key, input.fields)?;
        Ok(Updated { updated })
    });

    let s = spec.clone();
    reg.register(format!("{name}.delete"), move |ctx, input: KeyInput| {
        let deleted = TableStore::new(ctx.storage, &s).delete_by_key(&input.key)?;
        Ok(Deleted { deleted })
    });

    let s = spec.clone();
    reg.register(format!("{name}.list"), move |ctx, _: IgnoredAny| {
        TableStore::new(ctx.storage, &s).list_all()
    });
    reg.set_fallback(format!("{name}.list"), Value::Object(Default::default()));

    let s = spec.clone();
    reg.register(format!("{name}.get_row"), move |ctx, input: RowInput| {
        TableStore::new(ctx.storage, &s).get_row(input.row)
    });

    let s = spec.clone();
    reg.register(
        format!("{name}.update_row"),
        move |ctx, input: RowUpdateInput| {
            TableStore::new(ctx.storage, &s).update_row(input.row, input.fields)
        },
    );

    let s = spec;
    reg.register(format!("{name}.delete_row"), move |ctx, input: RowInput| {
        TableStore::new(ctx.storage, &s).delete_row(input.row)
    });
}

/// The value a command result should be shown as on a terminal.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
