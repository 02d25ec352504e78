//! Configuration Management
//!
//! File and environment configuration for runsweep. Precedence, lowest to
//! highest: built-in defaults, config file, environment; command-line flags
//! are applied on top by main.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "https://gitlab.com";
pub const DEFAULT_LOG_LEVEL: &str = "info";

const HOST_VAR: &str = "GITLAB_HOST";
const TOKEN_VAR: &str = "GITLAB_TOKEN";
const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

const CONFIG_FILE_NAME: &str = ".runsweep";

/// User configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// GitLab host URL
    #[serde(default)]
    pub host: Option<String>,
    /// Personal access token
    #[serde(default)]
    pub token: Option<String>,
    /// Log level name (error..trace)
    #[serde(default)]
    pub log_level: Option<String>,
    /// Exclude filters, by location name or id
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Include pattern over location names
    #[serde(default)]
    pub include: Option<String>,
}

impl Config {
    /// First existing config file among `~/.runsweep`, `~/.runsweep.yaml`
    /// and `~/.runsweep.yml`
    fn config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        ["", ".yaml", ".yml"]
            .iter()
            .map(|ext| home.join(format!("{CONFIG_FILE_NAME}{ext}")))
            .find(|path| path.exists())
    }

    /// Load configuration from disk; a missing or broken file falls back to
    /// defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::debug!("No config file used");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!("Using config file: {}", path.display());
                    config
                }
                Err(err) => {
                    tracing::warn!(
                        "Error parsing config {}: {err}. Are you using a config?",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!("Error reading config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Effective host (env > config > default)
    pub fn effective_host(&self) -> String {
        env_var(HOST_VAR)
            .or_else(|| self.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    /// Effective token (env > config); `None` means the API is unreachable
    pub fn effective_token(&self) -> Option<String> {
        env_var(TOKEN_VAR).or_else(|| self.token.clone())
    }

    /// Effective log level name (env > config > default)
    pub fn effective_log_level(&self) -> String {
        env_var(LOG_LEVEL_VAR)
            .or_else(|| self.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_yaml() {
        let config: Config = serde_yaml::from_str(
            "host: https://gitlab.example.com\n\
             token: glpat-secret\n\
             log_level: debug\n\
             exclude:\n  - infra\n  - \"1234\"\n\
             include: \"^team-\"\n",
        )
        .unwrap();

        assert_eq!(config.host.as_deref(), Some("https://gitlab.example.com"));
        assert_eq!(config.token.as_deref(), Some("glpat-secret"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(
            config.exclude,
            Some(vec!["infra".to_string(), "1234".to_string()])
        );
        assert_eq!(config.include.as_deref(), Some("^team-"));
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.host.is_none());
        assert!(config.token.is_none());
        assert!(config.exclude.is_none());
    }
}
