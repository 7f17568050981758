use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use inkstone_engine::ApiSettings;
use inkstone_logging::LogDestination;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "inkstone.ron";

/// Settings read from `inkstone.ron`; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Root directory of the draft store.
    pub drafts_dir: PathBuf,
    /// Author name put on new poems.
    pub author: String,
    /// Account id sent along with new poems.
    pub author_id: Option<u64>,
    /// Log to `inkstone.log`; otherwise only warnings reach the terminal.
    pub log_to_file: bool,
}

/// Where the loaded config came from. Reported once logging is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Missing,
    Unreadable(String),
    Invalid(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            api_base: api.base_url,
            token: api.token,
            connect_timeout_ms: duration_ms(api.connect_timeout),
            request_timeout_ms: duration_ms(api.request_timeout),
            drafts_dir: PathBuf::from(".inkstone"),
            author: String::new(),
            author_id: None,
            log_to_file: true,
        }
    }
}

impl AppConfig {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base.clone(),
            token: self.token.clone().filter(|token| !token.is_empty()),
            author_id: self.author_id,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn log_target(&self) -> (LogDestination, LevelFilter) {
        if self.log_to_file {
            (LogDestination::File, LevelFilter::Info)
        } else {
            (LogDestination::Terminal, LevelFilter::Warn)
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Reads the config file, falling back to defaults when it is missing or
/// does not parse. Runs before logging is set up, so nothing is logged here.
pub fn load_config(path: &Path) -> (AppConfig, ConfigSource) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (AppConfig::default(), ConfigSource::Missing);
        }
        Err(err) => {
            return (AppConfig::default(), ConfigSource::Unreadable(err.to_string()));
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, ConfigSource::File),
        Err(err) => (AppConfig::default(), ConfigSource::Invalid(err.to_string())),
    }
}
