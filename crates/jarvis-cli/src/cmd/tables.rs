use crate::output::{print_json, print_table};
use jarvis_core::table::{TableStorage, WorkbookStorage};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct TableSummary {
    name: String,
    columns: usize,
    rows: usize,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let storage = WorkbookStorage::open(root)?;

    let mut summaries = Vec::new();
    for name in storage.table_names()? {
        let table = storage.get(&name)?;
        summaries.push(TableSummary {
            name,
            columns: table.columns.len(),
            rows: table.rows.len(),
        });
    }

    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No tables. Run 'jarvis init' to create them.");
        return Ok(());
    }

    let rows = summaries
        .iter()
        .map(|s| vec![s.name.clone(), s.columns.to_string(), s.rows.to_string()])
        .collect();
    print_table(&["TABLE", "COLUMNS", "ROWS"], rows);
    Ok(())
}
