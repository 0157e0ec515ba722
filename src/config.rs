use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Class tokens toggled on the markup; these are the styling contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateClasses {
    pub heading_active: String,
    pub heading_hover: String,
    pub heading_asc: String,
    pub heading_desc: String,
    pub cell_active: String,
    pub cell_hover: String,
    pub row_hidden: String,
    pub modal_hidden: String,
}

impl Default for StateClasses {
    fn default() -> Self {
        Self {
            heading_active: "smart-table__heading_active".to_string(),
            heading_hover: "smart-table__heading_hover".to_string(),
            heading_asc: "smart-table__heading_asc".to_string(),
            heading_desc: "smart-table__heading_desc".to_string(),
            cell_active: "smart-table__cell_active".to_string(),
            cell_hover: "smart-table__cell_hover".to_string(),
            row_hidden: "smart-table__row_hidden".to_string(),
            modal_hidden: "modal_hidden".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classes: StateClasses,
    /// Event polling interval
    pub tick_rate_ms: u64,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Log file; defaults to `smart-table.log` in the config directory
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classes: StateClasses::default(),
            tick_rate_ms: 100,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".smart-table"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path).ok().flatten()
    }

    /// Load from an explicit path; `Ok(None)` when the file does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(path),
            None => Self::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("smart-table.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"classes": {"row_hidden": "is-hidden"}, "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(config.classes.row_hidden, "is-hidden");
        assert_eq!(config.classes.modal_hidden, "modal_hidden");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = Path::new("/definitely/not/here/config.json");
        assert!(Config::load_from(path).unwrap().is_none());
    }

    #[test]
    fn test_explicit_log_file() {
        let config = Config {
            log_file: Some("/tmp/table.log".to_string()),
            ..Default::default()
        };
        assert_eq!(config.log_path(), PathBuf::from("/tmp/table.log"));
    }
}
