use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub engine: EngineConfig,
    pub service: ServiceConfig,
}

/// Audio normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Target sample rate for the canonical waveform
    pub sample_rate: u32,
}

/// Capability engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    /// Model hint passed to the wired engines (e.g. "medium")
    pub model: String,
    /// Language hint passed to the wired engines
    pub language: String,
}

/// Which set of capability providers the daemon wires in.
///
/// Inference engines are integration points; the built-in mock set lets
/// the daemon and clients run without any model installed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Mock,
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory for upload and canonical-audio artifacts.
    /// Defaults to the system temp directory when unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: crate::defaults::SAMPLE_RATE,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Mock,
            model: "medium".to_string(),
            language: "en".to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { temp_dir: None }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DIARIST_MODEL → engine.model
    /// - DIARIST_LANGUAGE → engine.language
    /// - DIARIST_TEMP_DIR → service.temp_dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("DIARIST_MODEL")
            && !model.is_empty()
        {
            self.engine.model = model;
        }

        if let Ok(language) = std::env::var("DIARIST_LANGUAGE")
            && !language.is_empty()
        {
            self.engine.language = language;
        }

        if let Ok(dir) = std::env::var("DIARIST_TEMP_DIR")
            && !dir.is_empty()
        {
            self.service.temp_dir = Some(PathBuf::from(dir));
        }

        self
    }

    /// Directory where job artifacts are written.
    pub fn temp_dir(&self) -> PathBuf {
        self.service
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/diarist/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("diarist")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_diarist_env() {
        remove_env("DIARIST_MODEL");
        remove_env("DIARIST_LANGUAGE");
        remove_env("DIARIST_TEMP_DIR");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.engine.kind, EngineKind::Mock);
        assert_eq!(config.engine.model, "medium");
        assert_eq!(config.engine.language, "en");
        assert_eq!(config.service.temp_dir, None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [audio]
            sample_rate = 8000

            [engine]
            kind = "mock"
            model = "large-v3"
            language = "es"

            [service]
            temp_dir = "/var/tmp/diarist"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.audio.sample_rate, 8000);
        assert_eq!(config.engine.model, "large-v3");
        assert_eq!(config.engine.language, "es");
        assert_eq!(
            config.service.temp_dir,
            Some(PathBuf::from("/var/tmp/diarist"))
        );
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let toml_content = r#"
            [engine]
            model = "small"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.engine.model, "small");
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.engine.language, "en");
        assert_eq!(config.service.temp_dir, None);
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not = valid = toml").unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_override_model_and_language() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_diarist_env();

        set_env("DIARIST_MODEL", "tiny");
        set_env("DIARIST_LANGUAGE", "de");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.engine.model, "tiny");
        assert_eq!(config.engine.language, "de");

        clear_diarist_env();
    }

    #[test]
    fn test_env_override_temp_dir() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_diarist_env();

        set_env("DIARIST_TEMP_DIR", "/scratch");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.service.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.temp_dir(), PathBuf::from("/scratch"));

        clear_diarist_env();
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_diarist_env();

        set_env("DIARIST_MODEL", "");
        let config = Config::default().with_env_overrides();

        assert_eq!(config.engine.model, "medium");

        clear_diarist_env();
    }

    #[test]
    fn test_temp_dir_falls_back_to_system() {
        let config = Config::default();
        assert_eq!(config.temp_dir(), std::env::temp_dir());
    }
}
