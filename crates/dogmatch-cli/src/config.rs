use dogmatch_client::{FetchConfig, HttpClientConfig};
use dogmatch_core::{Error, Result, SortDirection};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DogmatchConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub sort_direction: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Let reqwest/hyper log below `warn`
    #[serde(default = "default_false")]
    pub log_http: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_http: false,
        }
    }
}

impl DogmatchConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("Invalid YAML in {}: {}", path.display(), e)))?
        };

        Ok(config)
    }

    /// Per-user config file, if one exists
    pub fn default_path() -> Option<PathBuf> {
        let path = dirs::config_dir()?.join("dogmatch").join("config.yaml");
        path.exists().then_some(path)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    pub fn merge_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("DOGMATCH_BASE_URL") {
            self.api.base_url = val;
        }

        if let Some(val) = lookup("DOGMATCH_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => eprintln!(
                    "Warning: Invalid DOGMATCH_TIMEOUT_SECS '{}', keeping {}",
                    val, self.api.timeout_secs
                ),
            }
        }

        if let Some(val) = lookup("DOGMATCH_PAGE_SIZE") {
            match val.parse::<u32>() {
                Ok(size) => self.search.page_size = size,
                Err(_) => eprintln!(
                    "Warning: Invalid DOGMATCH_PAGE_SIZE '{}', keeping {}",
                    val, self.search.page_size
                ),
            }
        }

        if let Some(val) = lookup("DOGMATCH_STATE_FILE") {
            self.storage.state_file = val;
        }

        if let Some(val) = lookup("DOGMATCH_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".to_string()));
        }
        if self.search.page_size == 0 {
            return Err(Error::Config("search.page_size must be greater than 0".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn page_size(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.search.page_size)
            .ok_or_else(|| Error::Config("search.page_size must be greater than 0".to_string()))
    }

    /// State file path with `~` expanded
    pub fn state_file(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.state_file).to_string())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        let mut client_config = HttpClientConfig {
            timeout_secs: self.api.timeout_secs,
            connect_timeout_secs: self.api.connect_timeout_secs,
            ..Default::default()
        };
        if let Some(user_agent) = &self.api.user_agent {
            client_config.user_agent = user_agent.clone();
        }

        FetchConfig::default()
            .with_base_url(self.api.base_url.clone())
            .with_client_config(client_config)
    }
}

fn default_base_url() -> String {
    dogmatch_client::fetch::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    12
}

fn default_state_file() -> String {
    "~/.dogmatch/state.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}
