use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

use crate::fetch::DEFAULT_BASE_URL;
use crate::query::{Features, SortField, SortOrder};
use crate::state::{BrowserSettings, ErrorPolicy};

/// Main browser configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BrowserConfig {
    /// Base URL of the recipe API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of recipes per page when pagination is enabled
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Which controls are enabled
    #[serde(default)]
    pub features: Features,
    /// Whether recipes stay on screen after a failed fetch
    #[serde(default)]
    pub on_error: ErrorPolicy,
    /// Initial sort field
    #[serde(default)]
    pub default_sort: SortField,
    /// Initial sort order
    #[serde(default)]
    pub default_order: SortOrder,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            features: Features::default(),
            on_error: ErrorPolicy::default(),
            default_sort: SortField::default(),
            default_order: SortOrder::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

impl BrowserConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BROWSER__ prefix
    /// 2. recipe-browser.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BROWSER__FEATURES__SORT=false
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Parse configuration from a TOML document, without consulting the
    /// environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn settings(&self) -> BrowserSettings {
        BrowserSettings {
            features: self.features,
            page_size: self.page_size,
            error_policy: self.on_error,
        }
    }
}

/// Load configuration from file and environment variables
///
/// See [`BrowserConfig::load`] for the precedence rules.
pub fn load_config() -> Result<BrowserConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-browser").required(false))
        // Use double underscore for nested: RECIPE_BROWSER__FEATURES__SEARCH
        .add_source(
            Environment::with_prefix("RECIPE_BROWSER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
