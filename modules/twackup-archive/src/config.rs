use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use twitter_client::Credentials;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot locate home directory for config file")]
    NoHomeDir,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// YAML-backed credentials file, `~/.config/twackup/oauth.yaml`:
///
/// ```yaml
/// oauth:
///   key: CONSUMER_KEY
///   secret: CONSUMER_SECRET
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub oauth: OAuthConfig,
}

#[derive(Clone, Default, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("key", &redact(&self.key))
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl Config {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            key: self.oauth.key.clone(),
            secret: self.oauth.secret.clone(),
        }
    }

    pub fn log_redacted(&self, path: &Path) {
        info!(
            path = %path.display(),
            oauth_key = %redact(&self.oauth.key),
            "Loaded config"
        );
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.oauth.key.is_empty() {
            return Err(ConfigError::MissingField("oauth key"));
        }
        if self.oauth.secret.is_empty() {
            return Err(ConfigError::MissingField("oauth secret"));
        }
        Ok(self)
    }
}

fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    if value.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{prefix}****")
    }
}

/// `$HOME/.config/twackup/oauth.yaml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".config").join("twackup").join("oauth.yaml"))
}

/// Load, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty document is treated like a file with every field left blank.
    if content.trim().is_empty() {
        return Config::default().validate();
    }
    let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate()
}

pub fn load_default_config() -> Result<(PathBuf, Config), ConfigError> {
    let path = default_config_path()?;
    let config = load_config(&path)?;
    Ok((path, config))
}
