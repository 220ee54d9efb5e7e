/// Application configuration
use crate::error::{CliError, Result};
use beats_playback::{ControllerConfig, DEFAULT_APP_NAME, MAX_RECOVERY_DELAY};
use beats_search_client::{SearchClientConfig, DEFAULT_BASE_URL, DEFAULT_SUGGEST_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "beats.toml";

/// Largest page size the search API accepts
const MAX_API_RESULTS: u32 = 50;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeatsConfig {
    #[serde(default = "default_api")]
    pub api: ApiSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_suggest")]
    pub suggest: SuggestSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_suggest_url")]
    pub suggest_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: u32,

    #[serde(default = "default_related_max_results")]
    pub related_max_results: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_recovery_delay_ms")]
    pub recovery_delay_ms: u64,

    #[serde(default = "default_app_name")]
    pub app_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggestSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl BeatsConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `beats.toml` is read if
    /// present. Environment variables use the `BEATS_` prefix with `__`
    /// between sections (`BEATS_API__MAX_RESULTS=20`). `BEATS_API_KEY` is
    /// accepted as a shorthand for the API key.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with BEATS_)
        settings = settings.add_source(
            config::Environment::with_prefix("BEATS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: BeatsConfig = settings.build()?.try_deserialize()?;

        if config.api.key.is_empty() {
            if let Ok(key) = std::env::var("BEATS_API_KEY") {
                config.api.key = key;
            }
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.max_results == 0 || self.api.max_results > MAX_API_RESULTS {
            return Err(CliError::Config(format!(
                "api.max_results must be between 1 and {MAX_API_RESULTS}"
            )));
        }

        if self.api.related_max_results == 0 || self.api.related_max_results > MAX_API_RESULTS {
            return Err(CliError::Config(format!(
                "api.related_max_results must be between 1 and {MAX_API_RESULTS}"
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(CliError::Config(
                "api.timeout_secs must be positive".to_string(),
            ));
        }

        if self.playback.recovery_delay_ms > MAX_RECOVERY_DELAY.as_millis() as u64 {
            return Err(CliError::Config(format!(
                "playback.recovery_delay_ms must be at most {}",
                MAX_RECOVERY_DELAY.as_millis()
            )));
        }

        if self.suggest.min_chars == 0 {
            return Err(CliError::Config(
                "suggest.min_chars must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings for the search API client
    pub fn search_client(&self) -> SearchClientConfig {
        SearchClientConfig {
            base_url: self.api.base_url.clone(),
            suggest_url: self.api.suggest_url.clone(),
            api_key: self.api.key.clone(),
            max_results: self.api.max_results,
            related_max_results: self.api.related_max_results,
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    /// Settings for the playback controller
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            app_name: self.playback.app_name.clone(),
            recovery_delay: Duration::from_millis(self.playback.recovery_delay_ms),
        }
    }

    /// Suggestion debounce window
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.suggest.debounce_ms)
    }
}

// Default values
fn default_api() -> ApiSettings {
    ApiSettings {
        key: String::new(),
        base_url: default_base_url(),
        suggest_url: default_suggest_url(),
        max_results: default_max_results(),
        related_max_results: default_related_max_results(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_suggest_url() -> String {
    DEFAULT_SUGGEST_URL.to_string()
}

fn default_max_results() -> u32 {
    15
}

fn default_related_max_results() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("beats"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        recovery_delay_ms: default_recovery_delay_ms(),
        app_name: default_app_name(),
    }
}

fn default_recovery_delay_ms() -> u64 {
    800
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_suggest() -> SuggestSettings {
    SuggestSettings {
        debounce_ms: default_debounce_ms(),
        min_chars: default_min_chars(),
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_chars() -> usize {
    2
}

impl Default for BeatsConfig {
    fn default() -> Self {
        Self {
            api: default_api(),
            storage: default_storage(),
            playback: default_playback(),
            suggest: default_suggest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = BeatsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.max_results, 15);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.controller().recovery_delay, Duration::from_millis(800));
    }

    #[test]
    fn rejects_long_recovery_delay() {
        let mut config = BeatsConfig::default();
        config.playback.recovery_delay_ms = 1500;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        config.playback.recovery_delay_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_results() {
        let mut config = BeatsConfig::default();
        config.api.max_results = 0;
        assert!(config.validate().is_err());

        config.api.max_results = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nkey = \"file-key\"\nmax_results = 25\n\n[suggest]\ndebounce_ms = 150"
        )
        .unwrap();

        let config = BeatsConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.api.key, "file-key");
        assert_eq!(config.api.max_results, 25);
        assert_eq!(config.api.related_max_results, 10);
        assert_eq!(config.suggest.debounce_ms, 150);
        assert_eq!(config.suggest.min_chars, 2);
        assert_eq!(config.search_client().max_results, 25);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = BeatsConfig::load(Some(Path::new("/nonexistent/beats.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
