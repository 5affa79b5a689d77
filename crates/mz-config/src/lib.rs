//! Configuration management for the Maklerzentrum content core.
//!
//! Parses `mz.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `cms.directus_url`
//! - `cms.public_token`
//! - `content_api.base_url`
//! - `content_api.admin_token`

mod expand;
mod locale;

pub use locale::Locale;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the hostname used for environment detection.
    pub hostname: Option<String>,
    /// Override the CMS mode.
    pub mode: Option<CmsMode>,
    /// Override the default locale.
    pub locale: Option<Locale>,
    /// Override the static content directory.
    pub content_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mz.toml";

/// Hostnames that select mock mode when `cms.mode = "auto"`.
const LOCAL_HOSTNAMES: &[&str] = &["localhost", "127.0.0.1"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity.
    pub site: SiteConfig,
    /// Headless CMS configuration.
    pub cms: CmsConfig,
    /// Alternate content API (optional section).
    pub content_api: Option<ContentApiConfig>,
    /// Content cache configuration.
    pub cache: CacheConfig,
    /// Consent configuration (paths are relative strings from TOML).
    consent: ConsentConfigRaw,
    /// Tracking tag identifiers.
    pub tracking: TrackingConfig,

    /// Resolved static content directory (set after loading).
    #[serde(skip)]
    pub content_dir: PathBuf,
    /// Resolved consent configuration (set after loading).
    #[serde(skip)]
    pub consent_resolved: ConsentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Hostname the site is served from.
    pub hostname: String,
    /// Default content locale.
    pub locale: Locale,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hostname: "maklerzentrum.ch".to_owned(),
            locale: Locale::DeCh,
        }
    }
}

/// How content is sourced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CmsMode {
    /// Derive from the hostname: local hosts use mock mode.
    #[default]
    Auto,
    /// Always read bundled static JSON.
    Mock,
    /// Always query the live CMS.
    Live,
}

/// Headless CMS configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Content source selection.
    pub mode: CmsMode,
    /// Directus base URL.
    pub directus_url: String,
    /// Directus public bearer token.
    pub public_token: String,
    /// Static content directory (relative to the config file).
    content_dir: Option<String>,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            mode: CmsMode::Auto,
            directus_url: "https://maklerzentrum.directus.app".to_owned(),
            public_token: String::new(),
            content_dir: None,
            timeout_secs: 30,
        }
    }
}

/// Alternate content API configuration.
#[derive(Debug, Deserialize)]
pub struct ContentApiConfig {
    /// API base URL.
    pub base_url: String,
    /// Bearer token for the admin endpoints. Empty disables the admin tier.
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl ContentApiConfig {
    /// Admin token if one is configured and non-empty.
    #[must_use]
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Validate the section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the base URL is empty or not http(s).
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "content_api.base_url")?;
        require_http_url(&self.base_url, "content_api.base_url")
    }
}

/// Content cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether fetched content is cached for the process lifetime.
    pub enabled: bool,
    /// Intended cache lifetime in seconds. Not enforced by the adapter.
    pub duration_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: 300,
        }
    }
}

/// Raw consent configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConsentConfigRaw {
    storage_dir: Option<String>,
    max_age_days: Option<u32>,
}

/// Resolved consent configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    /// Directory holding persisted consent records.
    pub storage_dir: PathBuf,
    /// Days after which a stored decision expires.
    pub max_age_days: u32,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".mz/consent"),
            max_age_days: 365,
        }
    }
}

/// Tracking tag identifiers. Unset ids disable the corresponding tag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Google Analytics 4 measurement id.
    pub ga4_id: Option<String>,
    /// `TikTok` pixel id.
    pub tiktok_pixel_id: Option<String>,
    /// Facebook pixel id.
    pub facebook_pixel_id: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`cms.public_token`").
        field: String,
        /// Error message (e.g., "${`DIRECTUS_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Whether a hostname denotes a local development machine.
#[must_use]
pub fn is_local_hostname(hostname: &str) -> bool {
    LOCAL_HOSTNAMES.contains(&hostname)
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mz.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Whether content is read from bundled static JSON.
    #[must_use]
    pub fn is_mock_mode(&self) -> bool {
        match self.cms.mode {
            CmsMode::Mock => true,
            CmsMode::Live => false,
            CmsMode::Auto => is_local_hostname(&self.site.hostname),
        }
    }

    /// HTTP timeout for CMS and content API requests.
    #[must_use]
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cms.timeout_secs)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(hostname) = &settings.hostname {
            self.site.hostname.clone_from(hostname);
        }
        if let Some(mode) = settings.mode {
            self.cms.mode = mode;
        }
        if let Some(locale) = settings.locale {
            self.site.locale = locale;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.content_dir.clone_from(content_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache.enabled = cache_enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_config_from(start)
    }

    /// Search for config file starting at `current` and walking up.
    fn discover_config_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            cms: CmsConfig::default(),
            content_api: None,
            cache: CacheConfig::default(),
            consent: ConsentConfigRaw::default(),
            tracking: TrackingConfig::default(),
            content_dir: base.join("content"),
            consent_resolved: ConsentConfig {
                storage_dir: base.join(".mz").join("consent"),
                max_age_days: 365,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_cms()?;
        if let Some(api) = &self.content_api {
            api.validate()?;
        }
        if self.consent_resolved.max_age_days == 0 {
            return Err(ConfigError::Validation(
                "consent.max_age_days must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate CMS configuration.
    fn validate_cms(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.hostname, "site.hostname")?;
        require_non_empty(&self.cms.directus_url, "cms.directus_url")?;
        require_http_url(&self.cms.directus_url, "cms.directus_url")?;

        if self.cms.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "cms.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.cms.directus_url = expand::expand_env(&self.cms.directus_url, "cms.directus_url")?;
        self.cms.public_token = expand::expand_env(&self.cms.public_token, "cms.public_token")?;

        if let Some(ref mut api) = self.content_api {
            api.base_url = expand::expand_env(&api.base_url, "content_api.base_url")?;
            api.admin_token =
                expand::expand_env_opt(api.admin_token.as_ref(), "content_api.admin_token")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content_dir = config_dir.join(self.cms.content_dir.as_deref().unwrap_or("content"));
        self.consent_resolved = ConsentConfig {
            storage_dir: config_dir.join(
                self.consent
                    .storage_dir
                    .as_deref()
                    .unwrap_or(".mz/consent"),
            ),
            max_age_days: self.consent.max_age_days.unwrap_or(365),
        };
    }
}
