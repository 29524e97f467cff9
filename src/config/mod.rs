use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Settings for the external classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// "local" or a fixed offset such as "+08:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,
    #[serde(default = "default_event_name")]
    pub default_event_name: String,
    #[serde(default = "default_timer_label")]
    pub default_timer_label: String,
    #[serde(default = "default_timer_seconds")]
    pub default_timer_seconds: i64,
    #[serde(default = "default_timer_tick_ms")]
    pub timer_tick_ms: u64,
    #[serde(default = "default_timer_finish_hint")]
    pub timer_finish_hint: String,
    /// Keep only the last K history entries. `None` keeps the whole session.
    #[serde(default)]
    pub history_limit: Option<usize>,
    #[serde(default = "default_true")]
    pub clear_on_start: bool,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_show_limit")]
    pub show_limit: i64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_utc_offset() -> String {
    "+08:00".to_string()
}
fn default_timestamp_format() -> String {
    "%Y/%m/%d %H:%M".to_string()
}
fn default_trigger_keywords() -> Vec<String> {
    vec!["紀錄".to_string(), "record".to_string()]
}
fn default_event_name() -> String {
    "event".to_string()
}
fn default_timer_label() -> String {
    "timer".to_string()
}
fn default_timer_seconds() -> i64 {
    60
}
fn default_timer_tick_ms() -> u64 {
    1000
}
fn default_timer_finish_hint() -> String {
    "Next step: keep monitoring the patient's response and prepare the next medication."
        .to_string()
}
fn default_true() -> bool {
    true
}
fn default_export_dir() -> String {
    ".".to_string()
}
fn default_show_limit() -> i64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            utc_offset: default_utc_offset(),
            timestamp_format: default_timestamp_format(),
            classifier: ClassifierConfig::default(),
            trigger_keywords: default_trigger_keywords(),
            default_event_name: default_event_name(),
            default_timer_label: default_timer_label(),
            default_timer_seconds: default_timer_seconds(),
            timer_tick_ms: default_timer_tick_ms(),
            timer_finish_hint: default_timer_finish_hint(),
            history_limit: None,
            clear_on_start: true,
            export_dir: default_export_dir(),
            show_limit: default_show_limit(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rcarelog")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rcarelog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rcarelog.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse configuration file: {e}")))
    }

    /// Initialize configuration file and database directory.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Config(format!("Failed to serialize configuration: {e}")))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(db_path)
    }
}
