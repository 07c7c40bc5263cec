//! Declarative catalogue of the workbook's entities.
//!
//! Each entity binds a table name and header row to a key field, a key
//! allocation policy, a key matching rule and timestamp hooks. The generic
//! [`TableStore`](crate::table::TableStore) does the rest.

use crate::error::{JarvisError, Result};
use crate::table::{Table, TableStorage};
use std::sync::{Arc, OnceLock};

/// How an entity's key is produced on add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdPolicy {
    /// The caller supplies the key.
    Manual,
    /// Allocate `prefix + padded(max + 1)` when the key is absent or empty.
    IfMissing { prefix: &'static str, width: usize },
    /// Always allocate, overwriting any supplied key.
    Always { prefix: &'static str, width: usize },
}

/// How a lookup key is compared with stored keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    Exact,
    /// Compare calendar dates (`YYYY-MM-DD`).
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOn {
    Add,
    Update,
    Both,
}

impl StampOn {
    pub fn on_add(self) -> bool {
        matches!(self, StampOn::Add | StampOn::Both)
    }

    pub fn on_update(self) -> bool {
        matches!(self, StampOn::Update | StampOn::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampFormat {
    /// A UTC date-time cell.
    DateTime,
    /// A text cell rendered with a `chrono` format string.
    Pattern(&'static str),
}

/// A field the store overwrites with the current time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub field: &'static str,
    pub on: StampOn,
    pub format: StampFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    /// Short name used in command labels (`agents.add`).
    pub name: &'static str,
    pub table: &'static str,
    pub key_field: &'static str,
    pub columns: &'static [&'static str],
    pub id_policy: IdPolicy,
    pub key_match: KeyMatch,
    pub stamps: Vec<Stamp>,
}

impl EntitySpec {
    /// Empty table with this entity's header row.
    pub fn empty_table(&self) -> Table {
        Table::new(self.table, self.columns.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

pub const AGENTS: &str = "agents";
pub const APPS: &str = "apps";
pub const PHASES: &str = "phases";
pub const JOURNAL: &str = "journal";
pub const LIMITATIONS: &str = "limitations";
pub const PLAYBOOK: &str = "playbook";
pub const PROJECTS: &str = "projects";
pub const QUEUE: &str = "queue";
pub const RETROBOOST: &str = "retroboost";
pub const TONES: &str = "tones";
pub const COMMANDS: &str = "commands";

const LAST_UPDATED: Stamp = Stamp {
    field: "Last Updated",
    on: StampOn::Both,
    format: StampFormat::DateTime,
};

fn catalogue() -> Vec<EntitySpec> {
    vec![
        EntitySpec {
            name: AGENTS,
            table: "Agents_Roster",
            key_field: "Agent Name",
            columns: &[
                "Agent Name",
                "Role",
                "Specialty",
                "Personality",
                "Assigned Systems",
                "Rules",
                "Gender",
                "Status",
                "Known Habit Drift",
                "Correction Protocol",
                "Last Evaluated",
                "Assigned Checkpoint",
                "Behavior Locked",
            ],
            id_policy: IdPolicy::Manual,
            key_match: KeyMatch::Exact,
            stamps: vec![],
        },
        EntitySpec {
            name: APPS,
            table: "App_Index",
            key_field: "App Name",
            columns: &["App Name", "Type", "Category", "Status", "SaveState Tab", "Notes"],
            id_policy: IdPolicy::Manual,
            key_match: KeyMatch::Exact,
            stamps: vec![],
        },
        EntitySpec {
            name: PHASES,
            table: "Build_Phases",
            key_field: "Phase",
            columns: &["Date", "Phase", "Task", "Status", "Confirmed By", "Notes"],
            id_policy: IdPolicy::Always {
                prefix: "PH-",
                width: 3,
            },
            key_match: KeyMatch::Exact,
            stamps: vec![Stamp {
                field: "Date",
                on: StampOn::Add,
                format: StampFormat::Pattern("%Y-%m-%d %H:%M UTC"),
            }],
        },
        EntitySpec {
            name: JOURNAL,
            table: "Session_Journal",
            key_field: "Date",
            columns: &[
                "Date",
                "Summary",
                "Key Decisions",
                "Changes Logged",
                "SaveState ID",
                "Notes",
            ],
            id_policy: IdPolicy::Manual,
            key_match: KeyMatch::Date,
            stamps: vec![],
        },
        EntitySpec {
            name: LIMITATIONS,
            table: "Known_Limitations",
            key_field: "Limitation ID",
            columns: &[
                "Limitation ID",
                "Type",
                "Description",
                "Impact",
                "Workaround",
                "Notes",
            ],
            id_policy: IdPolicy::IfMissing {
                prefix: "LIM-",
                width: 3,
            },
            key_match: KeyMatch::Exact,
            stamps: vec![],
        },
        EntitySpec {
            name: PLAYBOOK,
            table: "KeithOS_Playbook",
            key_field: "Rule ID",
            columns: &[
                "Rule ID",
                "Prompt Type",
                "Usage Scenario",
                "Instruction",
                "Example",
                "Notes",
                "Timestamp",
            ],
            id_policy: IdPolicy::Manual,
            key_match: KeyMatch::Exact,
            stamps: vec![Stamp {
                field: "Timestamp",
                on: StampOn::Add,
                format: StampFormat::DateTime,
            }],
        },
        EntitySpec {
            name: PROJECTS,
            table: "Projects_Tracker",
            key_field: "Project ID",
            columns: &[
                "Project ID",
                "Project Name",
                "System Type",
                "Related Apps",
                "Custom Ruleset",
                "SaveState Tab",
                "Status",
                "Notes",
            ],
            id_policy: IdPolicy::IfMissing {
                prefix: "PRJ-",
                width: 3,
            },
            key_match: KeyMatch::Exact,
            stamps: vec![],
        },
        EntitySpec {
            name: QUEUE,
            table: "Agent_Queues",
            key_field: "Task ID",
            columns: &[
                "Agent ID",
                "Agent Name",
                "Agent Role",
                "Task ID",
                "Task Description",
                "Status",
                "Priority",
                "Last Updated",
                "Notes",
            ],
            id_policy: IdPolicy::IfMissing {
                prefix: "TASK-",
                width: 3,
            },
            key_match: KeyMatch::Exact,
            stamps: vec![LAST_UPDATED],
        },
        EntitySpec {
            name: RETROBOOST,
            table: "SaveState_RetroBoostArcade",
            key_field: "Session ID",
            columns: &[
                "Session ID",
                "App",
                "Module",
                "Start Time",
                "End Time",
                "Status",
                "Notes",
                "System Name",
                "Type",
                "Assigned Agents",
                "Tracks",
                "Tone Protocol",
                "Module Components",
                "Unique Rules",
                "UI Notes",
                "Session Output Format",
                "Prompt Format",
                "Version Tag",
                "Live Code Reference",
                "Last Checkpoint",
                "Last UI Stage",
                "Resume Required",
                "Save Trigger",
                "Last Updated",
                "XP Earned",
                "Streak",
            ],
            id_policy: IdPolicy::Always {
                prefix: "RB-SESSION-",
                width: 3,
            },
            key_match: KeyMatch::Exact,
            stamps: vec![LAST_UPDATED],
        },
        EntitySpec {
            name: TONES,
            table: "ToneLibrary",
            key_field: "Tone ID",
            columns: &["Tone ID", "Tone Name", "Description", "Sample Phrase", "Active"],
            id_policy: IdPolicy::Manual,
            key_match: KeyMatch::Exact,
            stamps: vec![],
        },
        EntitySpec {
            name: COMMANDS,
            table: "Custom_Command_Repo",
            key_field: "Command Alias",
            columns: &[
                "Command Alias",
                "Mapped Command Label",
                "Preset Payload JSON",
                "Editable",
                "Notes / Conditions",
            ],
            id_policy: IdPolicy::Manual,
            key_match: KeyMatch::Exact,
            stamps: vec![],
        },
    ]
}

static BUILTINS: OnceLock<Vec<Arc<EntitySpec>>> = OnceLock::new();

/// Every built-in entity, in catalogue order.
pub fn builtins() -> &'static [Arc<EntitySpec>] {
    BUILTINS.get_or_init(|| catalogue().into_iter().map(Arc::new).collect())
}

/// Look an entity up by short name or table name.
pub fn find(name: &str) -> Result<Arc<EntitySpec>> {
    builtins()
        .iter()
        .find(|e| e.name == name || e.table == name)
        .cloned()
        .ok_or_else(|| JarvisError::UnknownEntity(name.to_string()))
}

/// Create every catalogue table missing from `storage`. Returns the names of
/// the tables that were created.
pub fn ensure_tables(storage: &dyn TableStorage) -> Result<Vec<String>> {
    let mut created = Vec::new();
    for spec in builtins() {
        if storage.create(spec.empty_table())? {
            tracing::info!(table = spec.table, "created table");
            created.push(spec.table.to_string());
        }
    }
    Ok(created)
}
