use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Which durable backend holds the session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

impl StorageBackend {
    /// Pick the backend from a store path: `.json` files use the JSON backend.
    pub fn from_path(path: &str) -> Self {
        let is_json = Path::new(path)
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            StorageBackend::Json
        } else {
            StorageBackend::Sqlite
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_storage")]
    pub storage: String,
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub allowed_reset_users: Vec<String>,
    #[serde(default = "default_reset_keyword")]
    pub reset_keyword: String,
    #[serde(default = "default_reset_timeout")]
    pub reset_timeout_secs: u64,
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_storage() -> String {
    Config::storage_file().to_string_lossy().to_string()
}
fn default_reset_keyword() -> String {
    "confirm".to_string()
}
fn default_reset_timeout() -> u64 {
    30
}
fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            backend: StorageBackend::default(),
            allowed_reset_users: Vec::new(),
            reset_keyword: default_reset_keyword(),
            reset_timeout_secs: default_reset_timeout(),
            time_format: default_time_format(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timeclock")
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".timeclock")
        }
    }

    /// Return the full path of the config file (`TIMECLOCK_CONFIG` wins)
    pub fn config_file() -> PathBuf {
        match env::var("TIMECLOCK_CONFIG") {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => Self::config_dir().join("timeclock.conf"),
        }
    }

    /// Return the default path of the SQLite store
    pub fn storage_file() -> PathBuf {
        Self::config_dir().join("timeclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Apply a `--store` override; the extension decides the backend.
    pub fn with_storage_override(mut self, storage: Option<&str>) -> Self {
        if let Some(path) = storage {
            self.storage = path.to_string();
            self.backend = StorageBackend::from_path(path);
        }
        self
    }

    pub fn is_reset_allowed(&self, user_id: &str) -> bool {
        self.allowed_reset_users.iter().any(|u| u == user_id)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize the configuration directory and, unless in test mode, the config file.
    /// Returns the configuration that was written.
    pub fn init_all(custom_storage: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let config = Config::default().with_storage_override(custom_storage);

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        Ok(config)
    }
}
