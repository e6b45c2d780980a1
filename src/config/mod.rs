pub mod init;
mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_TIMEOUT;

/// Environment variable that supplies the backend URL without a config file
pub const ENV_API_URL: &str = "LEADDESK_API_URL";

/// Get the config directory path (~/.config/leaddesk/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("leaddesk"))
        .unwrap_or_else(|| PathBuf::from(".leaddesk"))
}

/// Get the default config file path (~/.config/leaddesk/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/leaddesk/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file yields `Config::default()`; the API URL can
/// still come from the command line or the environment.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Write configuration atomically, creating parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

/// Pick the backend URL: command line, then environment, then config file.
pub fn resolve_api_url(cli_value: Option<&str>, env_value: Option<&str>, config: &Config) -> Result<String> {
    let non_blank = |s: &&str| !s.trim().is_empty();
    cli_value
        .filter(non_blank)
        .or_else(|| env_value.filter(non_blank))
        .or_else(|| config.api_url.as_deref().filter(non_blank))
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No API URL configured. Pass --api-url, set {}, or run `leaddesk init` to create {}",
                ENV_API_URL,
                get_config_path().display()
            )
        })
}

/// Request timeout from config, defaulting to 15s.
pub fn request_timeout(config: &Config) -> Result<Duration> {
    match config.timeout.as_deref() {
        None => Ok(DEFAULT_TIMEOUT),
        Some(raw) => humantime::parse_duration(raw.trim())
            .with_context(|| format!("timeout: invalid duration '{}'", raw)),
    }
}
