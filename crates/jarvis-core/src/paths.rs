use crate::error::{JarvisError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const JARVIS_DIR: &str = ".jarvis";
pub const TABLES_DIR: &str = ".jarvis/tables";
pub const CONFIG_FILE: &str = ".jarvis/config.yaml";

pub const TABLE_EXT: &str = "yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn jarvis_dir(root: &Path) -> PathBuf {
    root.join(JARVIS_DIR)
}

pub fn tables_dir(root: &Path) -> PathBuf {
    root.join(TABLES_DIR)
}

pub fn table_path(root: &Path, name: &str) -> PathBuf {
    tables_dir(root).join(format!("{name}.{TABLE_EXT}"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Table name validation
// ---------------------------------------------------------------------------

static TABLE_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn table_name_re() -> &'static Regex {
    TABLE_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").unwrap())
}

/// Table names double as file stems, so they are restricted to a safe set.
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.len() > 64 || !table_name_re().is_match(name) {
        return Err(JarvisError::InvalidTableName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
