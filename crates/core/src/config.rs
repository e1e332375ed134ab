//! Configuration management for s3seed

use crate::error::{Error, Result};
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration directory name
const CONFIG_DIR: &str = "s3seed";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Largest amount of entropy accepted per generated file
const MAX_ENTROPY_BYTES: usize = 4096;

/// Main configuration structure
///
/// Every section is optional; a missing config file behaves like an empty one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub s3: S3Config,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the generated files
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default = "default_entropy_bytes")]
    pub entropy_bytes: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            work_dir: default_work_dir(),
            entropy_bytes: default_entropy_bytes(),
        }
    }
}

/// S3 client settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct S3Config {
    /// Endpoint override for S3-compatible services
    pub endpoint: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
    /// Per-operation timeout in seconds (SDK default when unset)
    pub timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_file_prefix() -> String {
    "random_file".to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_entropy_bytes() -> usize {
    32
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Get the default configuration file path (`~/.config/s3seed/config.toml`)
pub fn get_config_path() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration from `path`, or from the default location when `None`.
///
/// A missing file yields the defaults. A file that exists but cannot be read
/// or parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };

    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| Error::InvalidConfig {
        path: config_path.clone(),
        message: format!("Failed to read config file: {}", e),
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| Error::InvalidConfig {
        path: config_path.clone(),
        message: format!("Failed to parse config file: {}", e),
    })?;

    debug!(path = %config_path.display(), "loaded config file");
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    let prefix = &config.seed.file_prefix;
    if prefix.is_empty() {
        return Err(Error::InvalidInput("File prefix cannot be empty".to_string()));
    }
    if prefix.contains('/') || prefix.contains('\\') {
        return Err(Error::InvalidInput(format!(
            "File prefix cannot contain path separators: {}",
            prefix
        )));
    }

    if config.seed.entropy_bytes == 0 || config.seed.entropy_bytes > MAX_ENTROPY_BYTES {
        return Err(Error::InvalidInput(format!(
            "entropy_bytes must be between 1 and {} (got {})",
            MAX_ENTROPY_BYTES, config.seed.entropy_bytes
        )));
    }

    if config.s3.timeout_secs == Some(0) {
        return Err(Error::InvalidInput("timeout_secs must be greater than 0".to_string()));
    }

    tracing_subscriber::EnvFilter::try_new(&config.logging.level).map_err(|e| {
        Error::InvalidInput(format!("Invalid log level '{}': {}", config.logging.level, e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.seed.file_prefix, "random_file");
        assert_eq!(config.seed.work_dir, PathBuf::from("."));
        assert_eq!(config.seed.entropy_bytes, 32);
        assert_eq!(config.s3.endpoint, None);
        assert!(!config.s3.force_path_style);
        assert_eq!(config.logging.level, "warn");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[seed]
file_prefix = "blob"
work_dir = "/tmp/seed"
entropy_bytes = 64

[s3]
endpoint = "http://localhost:9000"
force_path_style = true
timeout_secs = 10

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.seed.file_prefix, "blob");
        assert_eq!(config.seed.work_dir, PathBuf::from("/tmp/seed"));
        assert_eq!(config.seed.entropy_bytes, 64);
        assert_eq!(config.s3.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(config.s3.force_path_style);
        assert_eq!(config.s3.timeout_secs, Some(10));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[s3]\nendpoint = \"http://minio:9000\"\n").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.seed, SeedConfig::default());
        assert_eq!(config.s3.endpoint.as_deref(), Some("http://minio:9000"));
    }

    #[test]
    fn test_load_omitted_optional_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[s3]\nforce_path_style = true\n").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert!(config.s3.force_path_style);
        assert_eq!(config.s3.endpoint, None);
        assert_eq!(config.s3.timeout_secs, None);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[seed\nfile_prefix = ").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_validate_config_empty_prefix() {
        let mut config = ConfigFile::default();
        config.seed.file_prefix = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_prefix_with_separator() {
        let mut config = ConfigFile::default();
        config.seed.file_prefix = "../escape".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_entropy_bounds() {
        let mut config = ConfigFile::default();
        config.seed.entropy_bytes = 0;
        assert!(validate_config(&config).is_err());

        config.seed.entropy_bytes = MAX_ENTROPY_BYTES;
        assert!(validate_config(&config).is_ok());

        config.seed.entropy_bytes = MAX_ENTROPY_BYTES + 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_zero_timeout() {
        let mut config = ConfigFile::default();
        config.s3.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_bad_log_level() {
        let mut config = ConfigFile::default();
        config.logging.level = "s3seed=loud".to_string();
        assert!(validate_config(&config).is_err());
    }
}
