//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LESSONKIT_*)
//! 2. TOML config file (if LESSONKIT_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which block representation the extractor emits for lists and tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// List and table text and their images become sibling blocks.
    Flat,
    /// List items and table cells keep their text/image grouping.
    #[default]
    Structured,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LESSONKIT_*)
/// 2. TOML config file (if LESSONKIT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for page and image requests.
    ///
    /// Set via LESSONKIT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page fetch timeout in milliseconds.
    ///
    /// Set via LESSONKIT_PAGE_TIMEOUT_MS environment variable.
    #[serde(default = "default_page_timeout_ms")]
    pub page_timeout_ms: u64,

    /// Image download timeout in milliseconds.
    ///
    /// Set via LESSONKIT_IMAGE_TIMEOUT_MS environment variable.
    #[serde(default = "default_image_timeout_ms")]
    pub image_timeout_ms: u64,

    /// Maximum page body size in bytes.
    ///
    /// Set via LESSONKIT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Deepest container nesting the walker descends into.
    ///
    /// Set via LESSONKIT_MAX_DEPTH environment variable.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Flat or structured list/table output.
    ///
    /// Set via LESSONKIT_LAYOUT environment variable.
    #[serde(default)]
    pub layout: Layout,

    /// Whether referenced images are downloaded or copied locally.
    ///
    /// Set via LESSONKIT_DOWNLOAD_IMAGES environment variable.
    #[serde(default)]
    pub download_images: bool,

    /// Directory receiving downloaded and copied images.
    ///
    /// Set via LESSONKIT_IMAGE_DIR environment variable.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// CSS selectors probed in order for the main content container.
    #[serde(default = "default_content_selectors")]
    pub content_selectors: Vec<String>,

    /// CSS selectors probed in order for the page title.
    #[serde(default = "default_title_selectors")]
    pub title_selectors: Vec<String>,

    /// `id` of the element holding the question labels.
    #[serde(default = "default_questions_container_id")]
    pub questions_container_id: String,

    /// CSS selector of a question label inside the questions container.
    #[serde(default = "default_question_selector")]
    pub question_selector: String,

    /// Class marking a `div` as an alert/note box.
    #[serde(default = "default_alert_class")]
    pub alert_class: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .into()
}

fn default_page_timeout_ms() -> u64 {
    30_000
}

fn default_image_timeout_ms() -> u64 {
    10_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_depth() -> usize {
    5
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_content_selectors() -> Vec<String> {
    ["div.training-module", "div.page-content", "div.content", "article", "main", "body"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_title_selectors() -> Vec<String> {
    ["h4.page-title", "h1.page-title", "h1", "title"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_questions_container_id() -> String {
    "questionsDiv".into()
}

fn default_question_selector() -> String {
    "label.module-question".into()
}

fn default_alert_class() -> String {
    "card".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_timeout_ms: default_page_timeout_ms(),
            image_timeout_ms: default_image_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_depth: default_max_depth(),
            layout: Layout::default(),
            download_images: false,
            image_dir: default_image_dir(),
            content_selectors: default_content_selectors(),
            title_selectors: default_title_selectors(),
            questions_container_id: default_questions_container_id(),
            question_selector: default_question_selector(),
            alert_class: default_alert_class(),
        }
    }
}

impl AppConfig {
    /// Page fetch timeout as Duration.
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    /// Image download timeout as Duration.
    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LESSONKIT_`
    /// 2. TOML file from `LESSONKIT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LESSONKIT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LESSONKIT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
