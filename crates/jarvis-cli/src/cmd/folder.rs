use crate::output::print_json;
use jarvis_core::folders::{self, FolderAction, RenameOutcome};
use std::path::Path;

pub fn create(path: &Path, preset: Option<&str>, dry: bool, json: bool) -> anyhow::Result<()> {
    let actions = folders::create_folder(path, preset, dry)?;
    if json {
        return print_json(&actions);
    }
    for action in &actions {
        match action {
            FolderAction::Created(p) => println!("  created: {}", p.display()),
            FolderAction::Skipped(p) => println!("  exists:  {}", p.display()),
            FolderAction::WouldCreate(p) => println!("  [dry] would create: {}", p.display()),
        }
    }
    Ok(())
}

pub fn rename(old: &Path, new: &Path, dry: bool, json: bool) -> anyhow::Result<()> {
    let outcome = folders::rename_folder(old, new, dry)?;
    if json {
        print_json(&outcome)?;
    }
    match outcome {
        RenameOutcome::Renamed { from, to } if !json => {
            println!("Renamed {} -> {}", from.display(), to.display())
        }
        RenameOutcome::WouldRename { from, to } if !json => {
            println!("[dry] would rename {} -> {}", from.display(), to.display())
        }
        RenameOutcome::SourceMissing { from } => {
            anyhow::bail!("folder does not exist: {}", from.display())
        }
        RenameOutcome::TargetExists { to } => {
            anyhow::bail!("target already exists: {}", to.display())
        }
        _ => {}
    }
    Ok(())
}
