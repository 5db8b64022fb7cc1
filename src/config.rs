use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub removal: RemovalConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Prefix for relation target URLs. Defaults to `<base-uri><project>/_apis/wit/workItems/`.
    pub relation_base: Option<String>,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            relation_base: None,
            api_version: "4.1".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// Area and iteration (under the project) that removed items are moved to.
    pub area: String,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            area: "Optimizers".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub path: Option<PathBuf>,
    /// Defaults offered on first run.
    pub default_uri: String,
    pub default_project: String,
    /// Windows domain used to build the display name, e.g. `First Last<DOMAIN\FirstL>`.
    pub domain: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: None,
            default_uri: "https://tfs2018.net-bet.net/tfs/DefaultCollection/".into(),
            default_project: "theLotter".into(),
            domain: "NET-BET".into(),
        }
    }
}

impl AppConfig {
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials
            .path
            .clone()
            .unwrap_or_else(|| data_dir().join("credentials.txt"))
    }
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tfs-chores")
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}
