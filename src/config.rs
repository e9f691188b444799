//! Client configuration
//!
//! Stored as TOML. The default location comes from the platform config
//! directory and can be overridden with `RMIXER_CONFIG`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Error, Result};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV_VAR: &str = "RMIXER_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mixer: MixerConfig,
    pub ultragrid: UltraGridConfig,
}

/// Remote mixer endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    pub host: String,
    pub port: u16,
    /// Deadline for connect, write and read, in milliseconds
    pub timeout_ms: u64,
    pub max_response_bytes: usize,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_MIXER_PORT,
            timeout_ms: DEFAULT_MIXER_TIMEOUT_MS,
            max_response_bytes: MAX_RESPONSE_SIZE,
        }
    }
}

impl MixerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Far-end UltraGrid control GUI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UltraGridConfig {
    pub host: String,
    pub timeout_ms: u64,
    /// Address used to find the local interface facing the network
    pub probe_target: String,
}

impl Default for UltraGridConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ULTRAGRID_HOST.to_string(),
            timeout_ms: DEFAULT_ULTRAGRID_TIMEOUT_MS,
            probe_target: LOCAL_IP_PROBE_TARGET.to_string(),
        }
    }
}

impl UltraGridConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AppConfig {
    /// Platform default config path, e.g. `~/.config/rmixer/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("net", "i2cat", "rmixer").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Path from `RMIXER_CONFIG`, falling back to [`AppConfig::default_path`]
    pub fn resolve_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .or_else(Self::default_path)
    }

    /// Load from the resolved path. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::resolve_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.mixer.port, 7777);
        assert_eq!(config.mixer.max_response_bytes, 16384);
        assert_eq!(config.ultragrid.host, "127.0.0.1");
        assert_eq!(config.mixer.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [mixer]
            host = "10.0.0.5"
            "#,
        )
        .unwrap();

        assert_eq!(config.mixer.host, "10.0.0.5");
        assert_eq!(config.mixer.port, DEFAULT_MIXER_PORT);
        assert_eq!(config.ultragrid, UltraGridConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("rmixer-config-{}", std::process::id()))
            .join("config.toml");

        let mut config = AppConfig::default();
        config.mixer.port = 9000;
        config.ultragrid.host = "192.168.1.20".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_toml() {
        let path = std::env::temp_dir().join(format!("rmixer-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[mixer]\nport = \"not a number\"\n").unwrap();

        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));

        let _ = std::fs::remove_file(&path);
    }
}
