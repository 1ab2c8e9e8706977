use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracemine_engine::MiningParams;
use tracemine_types::Classifier;

/// Fallback environment variable for the trace directory, shared with the
/// logging proxy that writes the traces.
pub const TRACE_DIR_ENV: &str = "TRACE_DIR";

/// Resolve the tracemine data directory:
/// 1. XDG data directory
/// 2. ~/.tracemine (fallback for systems without XDG)
pub fn data_home() -> Result<PathBuf> {
    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("tracemine"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".tracemine"));
    }

    anyhow::bail!("Could not determine data directory: no HOME directory or XDG data directory found")
}

/// Resolve the trace directory based on priority:
/// 1. Explicit path (`--trace-dir` or `TRACEMINE_TRACE_DIR`)
/// 2. `TRACE_DIR` environment variable
/// 3. `trace_dir` from the config file
/// 4. `<data dir>/traces`
///
/// Every candidate gets tilde expansion.
pub fn resolve_trace_dir(explicit_path: Option<&str>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(TRACE_DIR_ENV)
        && !env_path.is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(path) = &config.trace_dir {
        return Ok(expand_tilde(path));
    }

    Ok(data_home()?.join("traces"))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub min_frequency: usize,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        let params = MiningParams::default();
        Self {
            min_frequency: params.min_frequency,
            min_length: params.min_length,
            max_length: params.max_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Classify failed actions as `pain` regardless of tool
    pub failure_as_pain: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            failure_as_pain: Classifier::default().failure_as_pain,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_dir: Option<String>,
    #[serde(default)]
    pub mining: MiningConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(data_home()?.join("config.toml"))
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.classifier.failure_as_pain)
    }

    /// Mining parameters from config, with CLI overrides applied
    pub fn mining_params(
        &self,
        min_frequency: Option<usize>,
        min_length: Option<usize>,
        max_length: Option<usize>,
    ) -> MiningParams {
        MiningParams::new(
            min_frequency.unwrap_or(self.mining.min_frequency),
            min_length.unwrap_or(self.mining.min_length),
            max_length.unwrap_or(self.mining.max_length),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.trace_dir, None);
        assert_eq!(config.mining.min_frequency, 2);
        assert_eq!(config.mining.min_length, 2);
        assert_eq!(config.mining.max_length, 5);
        assert!(config.classifier.failure_as_pain);
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_config_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "trace_dir = \"/var/traces\"\n\n[mining]\nmin_frequency = 4\n",
        )?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.trace_dir.as_deref(), Some("/var/traces"));
        assert_eq!(config.mining.min_frequency, 4);
        assert_eq!(config.mining.max_length, 5);
        assert!(config.classifier.failure_as_pain);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.classifier.failure_as_pain = false;
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded, config);
        assert!(!loaded.classifier().failure_as_pain);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[mining\nmin_frequency = ")?;

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
        Ok(())
    }

    #[test]
    fn test_mining_overrides() {
        let config = Config::default();
        let params = config.mining_params(Some(3), None, Some(4));
        assert_eq!(params.min_frequency, 3);
        assert_eq!(params.min_length, 2);
        assert_eq!(params.max_length, 4);
    }

    #[test]
    fn test_explicit_trace_dir_wins() -> Result<()> {
        let config = Config {
            trace_dir: Some("/from/config".to_string()),
            ..Config::default()
        };
        let dir = resolve_trace_dir(Some("/from/flag"), &config)?;
        assert_eq!(dir, PathBuf::from("/from/flag"));
        Ok(())
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_tilde("~/traces"),
                PathBuf::from(home).join("traces")
            );
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
