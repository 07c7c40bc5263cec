use anyhow::Context;
use jarvis_core::{config::Config, entity, paths, table::WorkbookStorage};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing Jarvis in: {}", root.display());

    // 1. Create .jarvis/tables
    let storage = WorkbookStorage::init(root)
        .with_context(|| format!("failed to create {}", paths::tables_dir(root).display()))?;

    // 2. Write config.yaml if missing
    if paths::config_path(root).exists() {
        println!("  exists:  {}", paths::CONFIG_FILE);
    } else {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    }

    // 3. Create every built-in table that is missing
    let created = entity::ensure_tables(&storage).context("failed to create tables")?;
    for spec in entity::builtins() {
        let verb = if created.iter().any(|t| t == spec.table) {
            "created:"
        } else {
            "exists: "
        };
        println!("  {verb} {}/{}.{}", paths::TABLES_DIR, spec.table, paths::TABLE_EXT);
    }

    println!("\nJarvis initialized. Next: jarvis tables");
    Ok(())
}
