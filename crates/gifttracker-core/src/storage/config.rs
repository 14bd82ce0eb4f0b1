//! TOML-based application configuration.
//!
//! Stores:
//! - Database location and lock timeout
//! - Suggestion defaults (result count, per-category cap)
//! - Display preferences used by front ends
//!
//! Configuration is stored at `~/.config/gifttracker/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Override for the database file. Defaults to `<data dir>/gifttracker.db`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Suggestion engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default = "default_per_category_cap")]
    pub per_category_cap: usize,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/gifttracker/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}
fn default_count() -> usize {
    crate::suggest::DEFAULT_SUGGESTION_COUNT
}
fn default_per_category_cap() -> usize {
    crate::suggest::DEFAULT_PER_CATEGORY_CAP
}
fn default_currency_symbol() -> String {
    "$".into()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            per_category_cap: default_per_category_cap(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let bad_value = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| bad_value(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| bad_value(format!("cannot parse '{value}' as number")))?,
                    // Optional strings serialize as null when unset
                    serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| bad_value(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Path of the SQLite database this configuration points at.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(data_dir()?.join("gifttracker.db")),
        }
    }

    /// Reject values the rest of the library cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suggestions.per_category_cap == 0 {
            return Err(ConfigError::InvalidValue {
                key: "suggestions.per_category_cap".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.suggestions.default_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "suggestions.default_count".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key, without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting configuration is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            CoreError::Config(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.suggestions.default_count, 3);
        assert_eq!(parsed.suggestions.per_category_cap, 3);
        assert_eq!(parsed.display.currency_symbol, "$");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[suggestions]\ndefault_count = 5\n").unwrap();
        assert_eq!(parsed.suggestions.default_count, 5);
        assert_eq!(parsed.suggestions.per_category_cap, 3);
        assert_eq!(parsed.database.busy_timeout_ms, 5_000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("suggestions.default_count").as_deref(), Some("3"));
        assert_eq!(cfg.get("display.currency_symbol").as_deref(), Some("$"));
        assert!(cfg.get("display.missing_key").is_none());
    }

    #[test]
    fn apply_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.apply("suggestions.per_category_cap", "5").unwrap();
        cfg.apply("display.currency_symbol", "€").unwrap();
        cfg.apply("database.path", "/tmp/gifts.db").unwrap();
        assert_eq!(cfg.suggestions.per_category_cap, 5);
        assert_eq!(cfg.display.currency_symbol, "€");
        assert_eq!(cfg.database.path.as_deref(), Some("/tmp/gifts.db"));
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("suggestions.nonexistent", "1").is_err());
        assert!(cfg.apply("suggestions.default_count", "many").is_err());
        assert_eq!(cfg.suggestions.default_count, 3);
    }

    #[test]
    fn apply_rejects_zero_cap() {
        let mut cfg = Config::default();
        let err = cfg.apply("suggestions.per_category_cap", "0").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Config(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.suggestions.per_category_cap, 3);
    }

    #[test]
    fn save_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.apply("suggestions.default_count", "7").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.suggestions.default_count, 7);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[suggestions\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::ParseFailed(_)))
        ));
    }
}
