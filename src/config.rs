//! Run configuration, loaded from TOML.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectorConfig {
    /// Parse compilation units on the rayon pool.
    pub parallel: bool,
    /// Warn about superclass and interface names that do not resolve.
    pub report_unresolved: bool,
    /// Check `@Override` annotations against supertype signatures.
    pub check_overrides: bool,
    /// Diagnostics kept per file; `0` keeps all of them.
    pub max_diagnostics_per_file: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            report_unresolved: true,
            check_overrides: true,
            max_diagnostics_per_file: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl InspectorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Settings for a single-threaded run, useful for deterministic tests.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

pub fn load(path: &Path) -> Result<InspectorConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    InspectorConfig::from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::{load, ConfigError, InspectorConfig};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn defaults_when_empty() {
        let config = InspectorConfig::from_toml_str("").expect("config should parse");
        assert_eq!(config, InspectorConfig::default());
        assert!(config.parallel);
        assert_eq!(config.max_diagnostics_per_file, 100);
    }

    #[test]
    fn loads_toml_config() {
        let path = temp_path("inspector_config");
        fs::write(&path, "parallel = false\nmax_diagnostics_per_file = 0\n").expect("write temp config");
        let config = load(&path).expect("config should parse");
        assert!(!config.parallel);
        assert_eq!(config.max_diagnostics_per_file, 0);
        assert!(config.check_overrides);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = InspectorConfig::from_toml_str("paralel = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load(&temp_path("inspector_config_missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().starts_with("failed to read config"));
    }

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}.toml", prefix, nanos))
    }
}
