use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid chart file pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

fn default_file_patterns() -> Vec<String> {
    vec![
        "**/*.cho".to_string(),
        "**/*.crd".to_string(),
        "**/*.chordpro".to_string(),
    ]
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory the host scans for chart files.
    pub charts_path: PathBuf,
    /// Glob patterns (relative to `charts_path`) selecting chart files.
    #[serde(default = "default_file_patterns")]
    pub file_patterns: Vec<String>,
    /// Forced accidental preference for transposition; `None` follows the
    /// chart's key.
    #[serde(default)]
    pub prefer_sharps: Option<bool>,
}

impl Config {
    pub fn new(charts_path: PathBuf) -> Self {
        Self {
            charts_path,
            file_patterns: default_file_patterns(),
            prefer_sharps: None,
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded charts path
        config.charts_path = Self::expand_path(&config.charts_path).unwrap_or(config.charts_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/chordsheet");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Whether a path relative to the charts root matches the configured
    /// chart patterns.
    pub fn matches_chart(&self, relative: &str) -> Result<bool, ConfigError> {
        for pattern in &self.file_patterns {
            let compiled =
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            if compiled.matches(relative) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::new(PathBuf::from("/tmp/charts"));
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.charts_path, PathBuf::from("/tmp/charts"));
        assert_eq!(loaded.file_patterns, config.file_patterns);
        assert_eq!(loaded.prefer_sharps, None);
    }

    #[test]
    fn missing_config_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn defaults_apply_to_sparse_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "charts_path = \"/tmp/charts\"\n").unwrap();

        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.file_patterns.len(), 3);
        assert_eq!(loaded.prefer_sharps, None);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "charts_path = [nonsense\n").unwrap();

        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn chart_patterns_match() {
        let config = Config::new(PathBuf::from("/tmp"));
        assert!(config.matches_chart("hymns/amazing-grace.cho").unwrap());
        assert!(config.matches_chart("song.crd").unwrap());
        assert!(!config.matches_chart("README.md").unwrap());
    }

    #[test]
    fn bad_pattern_is_reported() {
        let mut config = Config::new(PathBuf::from("/tmp"));
        config.file_patterns = vec!["[".to_string()];
        assert!(matches!(
            config.matches_chart("x.cho"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn tilde_is_expanded_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "charts_path = \"~/charts\"\n").unwrap();

        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert!(!loaded.charts_path.to_string_lossy().starts_with('~'));
    }
}
