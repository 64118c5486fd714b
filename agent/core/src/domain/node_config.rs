// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Host Configuration Types
//
// Settings for the Sentinel process itself, as opposed to the agent
// configuration it manages:
// - Location of the persisted agent configuration document
// - HTTP query interface bind address
// - Advisor (LLM) provider settings
// - Logging

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level host configuration (`sentinel.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Name reported to the advisor and in logs
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// Path of the persisted agent configuration document
    #[serde(default = "default_agent_config_path")]
    pub agent_config_path: PathBuf,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub advisor: AdvisorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Network bind address (e.g. "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_api_port(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Provider type: "gemini", "openai" or "openai-compatible"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(default = "default_api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: default_provider(),
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: default_api_key(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Literal keys stay out of logs; env: references are harmless.
        let api_key = self.api_key.as_deref().map(|k| {
            if k.starts_with("env:") {
                k
            } else {
                crate::domain::config::MASKED_VALUE
            }
        });
        f.debug_struct("AdvisorConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &api_key)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

pub const SUPPORTED_PROVIDERS: [&str; 3] = ["gemini", "openai", "openai-compatible"];

// Default value functions
fn default_true() -> bool {
    true
}

fn default_agent_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "sentinel-agent".to_string())
}

fn default_agent_config_path() -> PathBuf {
    PathBuf::from("./server-config.yaml")
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    3001
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key() -> Option<String> {
    Some("env:API_KEY".to_string())
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            agent_config_path: default_agent_config_path(),
            api: ApiConfig::default(),
            advisor: AdvisorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SentinelConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. SENTINEL_CONFIG_PATH environment variable
    /// 2. ./sentinel.yaml (working directory)
    /// 3. ~/.sentinel/config.yaml (user home)
    /// 4. /etc/sentinel/config.yaml (system, Unix) or C:\ProgramData\Sentinel\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SENTINEL_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./sentinel.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".sentinel").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/sentinel/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\Sentinel\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path: fail if missing/invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading host configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load host config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading host configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No host configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("SENTINEL_AGENT_CONFIG") {
            if !path.is_empty() {
                tracing::info!("Environment override: SENTINEL_AGENT_CONFIG={}", path);
                self.agent_config_path = PathBuf::from(path);
            }
        }

        if let Ok(val) = std::env::var("SENTINEL_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: SENTINEL_PORT={}", port);
                    self.api.port = port;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for SENTINEL_PORT: '{}'. Expected a port number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Resolve the advisor API key (supports "env:VAR_NAME" syntax).
    /// `None` when no key is configured or the referenced variable is unset/empty.
    pub fn resolve_api_key(&self) -> Option<String> {
        match self.advisor.api_key.as_deref() {
            Some(k) if k.starts_with("env:") => {
                let var_name = &k["env:".len()..];
                std::env::var(var_name).ok().filter(|v| !v.is_empty())
            }
            Some("") | None => None,
            Some(k) => Some(k.to_string()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.agent_config_path.as_os_str().is_empty() {
            anyhow::bail!("agent_config_path cannot be empty");
        }

        if self.api.port == 0 {
            anyhow::bail!("api.port must be between 1 and 65535");
        }

        if !SUPPORTED_PROVIDERS.contains(&self.advisor.provider.as_str()) {
            anyhow::bail!(
                "Unsupported advisor provider '{}'. Expected one of: {}",
                self.advisor.provider,
                SUPPORTED_PROVIDERS.join(", ")
            );
        }

        if self.advisor.enabled && self.advisor.endpoint.is_empty() {
            anyhow::bail!("advisor.endpoint cannot be empty when the advisor is enabled");
        }

        if !matches!(self.logging.format.as_str(), "json" | "text") {
            anyhow::bail!(
                "Invalid logging.format: '{}'. Must be 'json' or 'text'",
                self.logging.format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SentinelConfig::default();
        assert!(!config.agent_name.is_empty());
        assert_eq!(config.agent_config_path, PathBuf::from("./server-config.yaml"));
        assert_eq!(config.api.port, 3001);
        assert_eq!(config.advisor.provider, "gemini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SentinelConfig::from_yaml_str(
            r#"
agent_config_path: /var/lib/sentinel/server-config.yaml
advisor:
  provider: openai
  endpoint: https://api.openai.com/v1
  model: gpt-4o-mini
"#,
        )
        .unwrap();

        assert_eq!(
            config.agent_config_path,
            PathBuf::from("/var/lib/sentinel/server-config.yaml")
        );
        assert_eq!(config.advisor.provider, "openai");
        assert_eq!(config.advisor.api_key.as_deref(), Some("env:API_KEY"));
        assert_eq!(config.api.bind_address, "127.0.0.1");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_validation() {
        let mut config = SentinelConfig::default();

        config.api.port = 0;
        assert!(config.validate().is_err());
        config.api.port = 8080;

        config.advisor.provider = "bard".to_string();
        assert!(config.validate().is_err());
        config.advisor.provider = "openai-compatible".to_string();

        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
        config.logging.format = "json".to_string();

        config.agent_config_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_literal_api_key() {
        let mut config = SentinelConfig::default();
        config.advisor.api_key = Some("sk-literal".to_string());
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-literal"));

        config.advisor.api_key = None;
        assert!(config.resolve_api_key().is_none());

        config.advisor.api_key = Some("env:SENTINEL_TEST_UNSET_KEY_VAR".to_string());
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_debug_hides_literal_api_key() {
        let mut config = AdvisorConfig::default();
        config.api_key = Some("sk-live-secret".to_string());
        assert!(!format!("{config:?}").contains("sk-live-secret"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.yaml");

        let mut config = SentinelConfig::default();
        config.agent_name = "edge-01".to_string();
        config.api.port = 9000;
        config.to_yaml_file(&path).unwrap();

        let loaded = SentinelConfig::from_yaml_file(&path).unwrap();
        assert_eq!(loaded.agent_name, "edge-01");
        assert_eq!(loaded.api.port, 9000);
    }
}
