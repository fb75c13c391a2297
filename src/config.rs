use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app::OnError;
use crate::domain::LabelPolicy;
use crate::error::{EnerguideError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "energuide.toml";
pub const ON_ERROR_ENV: &str = "ENERGUIDE_ON_ERROR";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transform: TransformConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub on_error: OnError,
    pub label_policy: LabelPolicy,
    pub parallel: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            on_error: OnError::Skip,
            label_policy: LabelPolicy::Strict,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load `.env`, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `energuide.toml` in the
    /// working directory is read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Config::default(),
        };

        if let Ok(value) = env::var(ON_ERROR_ENV) {
            config.apply_on_error_override(&value)?;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            EnerguideError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_on_error_override(&mut self, value: &str) -> Result<()> {
        self.transform.on_error = value
            .parse()
            .map_err(|e: String| EnerguideError::Config(format!("{}: {}", ON_ERROR_ENV, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.transform.on_error, OnError::Skip);
        assert_eq!(config.transform.label_policy, LabelPolicy::Strict);
        assert!(config.transform.parallel);
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml_str(
            r#"
            [transform]
            on_error = "halt"
            label_policy = "warn"
            parallel = false

            [logging]
            directory = "/var/log/energuide"
            "#,
        )
        .unwrap();

        assert_eq!(config.transform.on_error, OnError::Halt);
        assert_eq!(config.transform.label_policy, LabelPolicy::Warn);
        assert!(!config.transform.parallel);
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/energuide"));
    }

    #[test]
    fn test_bad_value_is_toml_error() {
        let err = Config::from_toml_str("[transform]\non_error = \"retry\"\n").unwrap_err();
        assert!(matches!(err, EnerguideError::Toml(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, EnerguideError::Config(_)));
    }

    #[test]
    fn test_on_error_override() {
        let mut config = Config::default();
        config.apply_on_error_override("halt").unwrap();
        assert_eq!(config.transform.on_error, OnError::Halt);
        assert!(config.apply_on_error_override("sometimes").is_err());
    }
}
