use anyhow::{bail, Context};
use std::path::Path;
use std::process::Command;

pub fn run(root: &Path, message: &[String]) -> anyhow::Result<()> {
    let git = which::which("git").context("git not found on PATH")?;
    let message = if message.is_empty() {
        default_message()
    } else {
        message.join(" ")
    };

    println!("Staging all changes...");
    run_git(&git, root, &["add", "."])?;

    let status = Command::new(&git)
        .args(["status", "--porcelain"])
        .current_dir(root)
        .output()
        .context("failed to run git status")?;
    if !status.status.success() {
        bail!(
            "git status failed: {}",
            String::from_utf8_lossy(&status.stderr).trim()
        );
    }
    if String::from_utf8_lossy(&status.stdout).trim().is_empty() {
        println!("Nothing to commit. Working tree clean.");
        return Ok(());
    }

    println!("Committing changes...");
    run_git(&git, root, &["commit", "-m", &message])?;

    println!("Pushing to main...");
    run_git(&git, root, &["push", "origin", "main"])?;

    println!("Push complete.");
    Ok(())
}

fn default_message() -> String {
    format!(
        "Jarvis Auto Commit – {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

fn run_git(git: &Path, root: &Path, args: &[&str]) -> anyhow::Result<()> {
    tracing::debug!(?args, "running git");
    let status = Command::new(git)
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !status.success() {
        bail!("git {} failed ({status})", args.join(" "));
    }
    Ok(())
}
