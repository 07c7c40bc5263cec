//! Forward commands to a remote transport.

use crate::config::RelayConfig;
use crate::envelope::{CommandReply, CommandRequest};
use crate::error::{JarvisError, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

/// POST `{commandLabel, data}` to the configured relay and return its reply.
///
/// Error replies are returned as [`CommandReply::Error`], not as `Err`; only
/// transport failures and unreadable bodies fail.
pub fn send(cfg: &RelayConfig, label: &str, data: Value) -> Result<CommandReply> {
    let url = cfg.url.as_deref().ok_or(JarvisError::RelayNotConfigured)?;
    let client = Client::builder().timeout(TIMEOUT).build()?;

    let response = client
        .post(url)
        .json(&CommandRequest::new(label, data))
        .send()?;
    let status = response.status();
    let body = response.text()?;

    let reply: CommandReply = serde_json::from_str(&body).map_err(|_| JarvisError::RelayReply {
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })?;

    tracing::info!(
        command = label,
        deployment = cfg.deployment_id.as_deref().unwrap_or("-"),
        ok = reply.is_success(),
        "relay replied"
    );
    Ok(reply)
}
