//! Folder scaffolding from named presets.

use crate::error::{JarvisError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Named folder trees, each a list of directories relative to the base path.
pub const PRESETS: &[(&str, &[&str])] = &[
    (
        "mbba-logo",
        &[
            "01_Logo_Design_AD2",
            "01_Logo_Design_AD2/Sketches_Concepts",
            "01_Logo_Design_AD2/Final_Logo_SVG",
            "01_Logo_Design_AD2/Final_Logo_PNG",
            "01_Logo_Design_AD2/AD2_Templates",
            "02_Canva_Asset_Prep",
            "02_Canva_Asset_Prep/Logos_For_Canva",
            "02_Canva_Asset_Prep/Brand_Colors_Reference",
            "02_Canva_Asset_Prep/Font_Info",
            "02_Canva_Asset_Prep/Canva_Upload_Log",
            "03_Client_Delivery",
            "03_Client_Delivery/Brand_Guide_PDF",
            "03_Client_Delivery/Usage_Notes",
        ],
    ),
    (
        "branding-kit-template",
        &[
            "Working Files",
            "Working Files/Docs",
            "Working Files/Moodboard + References",
            "Working Files/AD2 Files",
            "Working Files/Drafts",
            "Final Delivery",
            "Final Delivery/Brand Colors",
            "Final Delivery/Fonts",
            "Final Delivery/Logo Master Files",
            "Final Delivery/PDFs",
            "Final Delivery/PNGs",
            "Final Delivery/SVGs",
            "Final Delivery/Social Templates",
        ],
    ),
];

pub fn preset(name: &str) -> Result<&'static [&'static str]> {
    PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, dirs)| *dirs)
        .ok_or_else(|| {
            let known: Vec<_> = preset_names().collect();
            JarvisError::UnknownPreset(format!("{name} (known: {})", known.join(", ")))
        })
}

pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(n, _)| *n)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "path", rename_all = "snake_case")]
pub enum FolderAction {
    Created(PathBuf),
    Skipped(PathBuf),
    WouldCreate(PathBuf),
}

/// Create `base`, or every directory of `preset` under `base`. Existing
/// directories are skipped; a dry run creates nothing.
pub fn create_folder(base: &Path, preset_name: Option<&str>, dry_run: bool) -> Result<Vec<FolderAction>> {
    let targets: Vec<PathBuf> = match preset_name {
        Some(name) => preset(name)?.iter().map(|rel| base.join(rel)).collect(),
        None => vec![base.to_path_buf()],
    };

    let mut actions = Vec::with_capacity(targets.len());
    for path in targets {
        if dry_run {
            actions.push(FolderAction::WouldCreate(path));
        } else if path.exists() {
            actions.push(FolderAction::Skipped(path));
        } else {
            std::fs::create_dir_all(&path)?;
            tracing::info!(path = %path.display(), "created folder");
            actions.push(FolderAction::Created(path));
        }
    }
    Ok(actions)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    WouldRename { from: PathBuf, to: PathBuf },
    SourceMissing { from: PathBuf },
    TargetExists { to: PathBuf },
}

/// Rename a folder unless the source is missing or the target exists.
pub fn rename_folder(from: &Path, to: &Path, dry_run: bool) -> Result<RenameOutcome> {
    if !from.exists() {
        return Ok(RenameOutcome::SourceMissing {
            from: from.to_path_buf(),
        });
    }
    if to.exists() {
        return Ok(RenameOutcome::TargetExists {
            to: to.to_path_buf(),
        });
    }
    if dry_run {
        return Ok(RenameOutcome::WouldRename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }
    std::fs::rename(from, to)?;
    tracing::info!(from = %from.display(), to = %to.display(), "renamed folder");
    Ok(RenameOutcome::Renamed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn presets_are_known() {
        assert_eq!(preset("mbba-logo").unwrap().len(), 13);
        assert_eq!(preset("branding-kit-template").unwrap().len(), 13);
        let err = preset("nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown preset: nope (known: mbba-logo, branding-kit-template)"
        );
        assert_eq!(preset_names().count(), 2);
    }

    #[test]
    fn dry_run_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("MBBA_LogoRebrand");
        let actions = create_folder(&base, Some("mbba-logo"), true).unwrap();
        assert_eq!(actions.len(), 13);
        assert!(actions
            .iter()
            .all(|a| matches!(a, FolderAction::WouldCreate(_))));
        assert!(!base.exists());
    }

    #[test]
    fn preset_creates_tree_and_skips_existing() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("Kit");
        std::fs::create_dir_all(base.join("Working Files/Docs")).unwrap();

        let actions = create_folder(&base, Some("branding-kit-template"), false).unwrap();
        let skipped = actions
            .iter()
            .filter(|a| matches!(a, FolderAction::Skipped(_)))
            .count();
        assert_eq!(skipped, 2);
        assert!(base.join("Final Delivery/Social Templates").is_dir());
    }

    #[test]
    fn no_preset_creates_base_only() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("a/b");
        let actions = create_folder(&base, None, false).unwrap();
        assert_eq!(actions, vec![FolderAction::Created(base.clone())]);
        assert!(base.is_dir());
    }

    #[test]
    fn rename_checks_source_and_target() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("Old");
        let new = dir.path().join("New");

        assert!(matches!(
            rename_folder(&old, &new, false).unwrap(),
            RenameOutcome::SourceMissing { .. }
        ));

        std::fs::create_dir(&old).unwrap();
        assert!(matches!(
            rename_folder(&old, &new, true).unwrap(),
            RenameOutcome::WouldRename { .. }
        ));
        assert!(old.exists());

        assert!(matches!(
            rename_folder(&old, &new, false).unwrap(),
            RenameOutcome::Renamed { .. }
        ));
        assert!(new.is_dir() && !old.exists());

        std::fs::create_dir(&old).unwrap();
        assert!(matches!(
            rename_folder(&old, &new, false).unwrap(),
            RenameOutcome::TargetExists { .. }
        ));
    }
}
