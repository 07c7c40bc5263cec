use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Subcommand;
use jarvis_core::{
    command::builtin::display_value,
    config::{Config, WarnLevel},
    envelope::CommandReply,
    relay,
};
use serde_json::Value;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum RelaySubcommand {
    /// Save the relay URL and deployment id
    Set {
        url: String,
        deployment_id: Option<String>,
    },

    /// Show the saved relay settings
    Show,

    /// Forward a command to the relay
    Send {
        label: String,
        /// JSON payload (default: {})
        #[arg(long)]
        data: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: RelaySubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        RelaySubcommand::Set { url, deployment_id } => set(root, url, deployment_id, json),
        RelaySubcommand::Show => show(root, json),
        RelaySubcommand::Send { label, data } => send(root, &label, data.as_deref(), json),
    }
}

fn set(root: &Path, url: String, deployment_id: Option<String>, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load(root)?;
    config.set_relay(url, deployment_id);

    let errors: Vec<String> = config
        .validate()
        .into_iter()
        .filter(|w| w.level == WarnLevel::Error)
        .map(|w| w.message)
        .collect();
    if !errors.is_empty() {
        bail!("{}", errors.join("; "));
    }

    config.save(root).context("failed to write config.yaml")?;
    if json {
        return print_json(&config.relay);
    }
    println!("Relay saved.");
    Ok(())
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    if json {
        return print_json(&config.relay);
    }
    println!("url:           {}", config.relay.url.as_deref().unwrap_or("(not set)"));
    println!(
        "deployment_id: {}",
        config.relay.deployment_id.as_deref().unwrap_or("(not set)")
    );
    Ok(())
}

fn send(root: &Path, label: &str, data: Option<&str>, json: bool) -> anyhow::Result<()> {
    let payload = match data {
        Some(raw) => serde_json::from_str(raw).context("--data is not valid JSON")?,
        None => Value::Object(Default::default()),
    };

    let config = Config::load(root)?;
    let reply = relay::send(&config.relay, label, payload)
        .with_context(|| format!("relay send of {label} failed"))?;

    if json {
        print_json(&reply)?;
    }
    match reply {
        CommandReply::Success { result } => {
            if !json {
                println!("{}", display_value(&result));
            }
            Ok(())
        }
        CommandReply::Error { message } => bail!("relay: {message}"),
    }
}
