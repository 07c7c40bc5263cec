use crate::output::print_json;
use anyhow::Context;
use jarvis_core::command::{alias, builtin::display_value, default_registry};
use jarvis_core::table::WorkbookStorage;
use serde_json::Value;
use std::path::Path;

pub fn run(root: &Path, label: &str, data: Option<&str>, json: bool) -> anyhow::Result<()> {
    let payload = data
        .map(|raw| serde_json::from_str::<Value>(raw).context("--data is not valid JSON"))
        .transpose()?;

    let storage = WorkbookStorage::open(root)?;
    let registry = default_registry();
    let result = registry.route(&storage, label, payload)?;
    print_result(&result, json)
}

pub fn run_alias(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let storage = WorkbookStorage::open(root)?;
    let registry = default_registry();
    let result = alias::run_alias(&registry, &storage, name)?;
    print_result(&result, json)
}

fn print_result(result: &Value, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(result)
    } else {
        println!("{}", display_value(result));
        Ok(())
    }
}
