use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::Provider;
use crate::present::ColorMode;

const DEFAULT_DIR: &str = ".tdict";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_cache_path(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_cache_path() -> PathBuf {
    home_dir().join(DEFAULT_DIR).join("tdict.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    format!("termdict/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default)]
    pub color: ColorMode,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_dicts")]
    pub default_dicts: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            verbose: false,
            default_dicts: default_dicts(),
        }
    }
}

fn default_dicts() -> Vec<String> {
    vec![Provider::Yahoo.id().to_string()]
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub yahoo: YahooConfig,
    #[serde(default)]
    pub oxford: OxfordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct YahooConfig {
    #[serde(default = "default_yahoo_url")]
    pub base_url: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: default_yahoo_url(),
        }
    }
}

fn default_yahoo_url() -> String {
    "https://tw.dictionary.yahoo.com".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OxfordConfig {
    #[serde(default = "default_oxford_url")]
    pub base_url: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub app_key: Option<String>,
}

impl Default for OxfordConfig {
    fn default() -> Self {
        Self {
            base_url: default_oxford_url(),
            app_id: None,
            app_key: None,
        }
    }
}

fn default_oxford_url() -> String {
    "https://od-api.oxforddictionaries.com/api/v1".to_string()
}

impl OxfordConfig {
    pub fn is_configured(&self) -> bool {
        self.app_id.is_some() && self.app_key.is_some()
    }
}

impl Config {
    /// Whether `provider` has everything it needs to run a query.
    pub fn is_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::Yahoo => true,
            Provider::Oxford => self.providers.oxford.is_configured(),
        }
    }

    /// Providers to query when none are named on the command line.
    pub fn default_providers(&self) -> Result<Vec<Provider>> {
        self.display
            .default_dicts
            .iter()
            .map(|id| {
                id.parse::<Provider>()
                    .map_err(|e| anyhow::anyhow!("display.default_dicts: {}", e))
            })
            .collect()
    }
}

/// Default config location: `~/.tdict/tdict.toml`.
pub fn default_config_path() -> PathBuf {
    home_dir().join(DEFAULT_DIR).join("tdict.toml")
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is read
/// if present and built-in defaults are used otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                parse_file(&path)?
            } else {
                Config::default()
            }
        }
    };
    validate(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| "Failed to parse config file")
}

fn validate(config: &Config) -> Result<()> {
    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be > 0");
    }

    if config.display.default_dicts.is_empty() {
        anyhow::bail!("display.default_dicts must name at least one dictionary");
    }
    config.default_providers()?;

    if config.cache.enabled && config.cache.path.as_os_str().is_empty() {
        anyhow::bail!("cache.path must be set when cache.enabled = true");
    }

    Ok(())
}
