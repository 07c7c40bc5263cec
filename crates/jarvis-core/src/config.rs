use crate::error::{JarvisError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RelayConfig
// ---------------------------------------------------------------------------

/// Remote transport the CLI forwards commands to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL advertised in the plugin manifest and OpenAPI document.
    /// Falls back to `http://<Host>` of the request when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_url: None,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            api_base: default_api_base(),
            max_tokens: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PluginConfig
// ---------------------------------------------------------------------------

/// Identity fields of the plugin manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default = "default_name_for_human")]
    pub name_for_human: String,
    #[serde(default = "default_name_for_model")]
    pub name_for_model: String,
    #[serde(default = "default_description_for_human")]
    pub description_for_human: String,
    #[serde(default = "default_description_for_model")]
    pub description_for_model: String,
    #[serde(default = "default_logo_url")]
    pub logo_url: String,
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
    #[serde(default = "default_legal_info_url")]
    pub legal_info_url: String,
}

fn default_name_for_human() -> String {
    "KeithOS Command Plugin".to_string()
}

fn default_name_for_model() -> String {
    "keithos_command_plugin".to_string()
}

fn default_description_for_human() -> String {
    "Trigger internal commands inside KeithOS.".to_string()
}

fn default_description_for_model() -> String {
    "Use this tool to execute commands like logging protocols, updating agents, or writing entries."
        .to_string()
}

fn default_logo_url() -> String {
    "https://yourdomain.com/logo.png".to_string()
}

fn default_contact_email() -> String {
    "you@example.com".to_string()
}

fn default_legal_info_url() -> String {
    "https://yourdomain.com/legal".to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            name_for_human: default_name_for_human(),
            name_for_model: default_name_for_model(),
            description_for_human: default_description_for_human(),
            description_for_model: default_description_for_model(),
            logo_url: default_logo_url(),
            contact_email: default_contact_email(),
            legal_info_url: default_legal_info_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub plugin: PluginConfig,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(JarvisError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Err(JarvisError::NotInitialized) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn set_relay(&mut self, url: impl Into<String>, deployment_id: Option<String>) {
        self.relay.url = Some(url.into());
        self.relay.deployment_id = deployment_id;
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(url) = &self.relay.url {
            if !is_http_url(url) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("relay.url '{url}' is not an http(s) URL"),
                });
            }
            if self.relay.deployment_id.is_none() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "relay.url is set but relay.deployment_id is empty".to_string(),
                });
            }
        }

        if let Some(url) = &self.server.public_url {
            if !is_http_url(url) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("server.public_url '{url}' is not an http(s) URL"),
                });
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "llm.temperature {} is outside 0.0..=2.0",
                    self.llm.temperature
                ),
            });
        }

        warnings
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(JarvisError::NotInitialized)
        ));
        assert_eq!(Config::load_or_default(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.set_relay("https://relay.example/exec", Some("AKfy-123".into()));
        cfg.server.port = 8080;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_gets_defaults() {
        let cfg: Config = serde_yaml::from_str("llm:\n  model: gpt-3.5-turbo\n").unwrap();
        assert_eq!(cfg.llm.model, "gpt-3.5-turbo");
        assert_eq!(cfg.llm.temperature, 0.7);
        assert_eq!(cfg.server.port, 3141);
        assert_eq!(cfg.plugin.name_for_model, "keithos_command_plugin");
        assert!(cfg.relay.url.is_none());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut cfg = Config::default();
        cfg.set_relay("ftp://nope", None);
        cfg.llm.temperature = 3.5;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("relay.url")));
        assert!(warnings.iter().any(|w| w.message.contains("deployment_id")));
        assert!(warnings.iter().any(|w| w.message.contains("temperature")));
    }
}
