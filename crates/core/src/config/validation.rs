//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Deepest recursion bound accepted for the content walker.
const MAX_DEPTH_LIMIT: usize = 64;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < 100 {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if value > 300_000 {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - either timeout is less than 100ms or exceeds 5 minutes
    /// - `max_depth` exceeds 64
    /// - a required string or selector list is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        check_timeout("page_timeout_ms", self.page_timeout_ms)?;
        check_timeout("image_timeout_ms", self.image_timeout_ms)?;

        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(invalid("max_depth", "must not exceed 64"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.image_dir.as_os_str().is_empty() {
            return Err(invalid("image_dir", "must not be empty"));
        }
        if self.content_selectors.is_empty() {
            return Err(invalid("content_selectors", "must list at least one selector"));
        }
        if self.title_selectors.is_empty() {
            return Err(invalid("title_selectors", "must list at least one selector"));
        }
        if self.questions_container_id.is_empty() {
            return Err(invalid("questions_container_id", "must not be empty"));
        }
        if self.question_selector.is_empty() {
            return Err(invalid("question_selector", "must not be empty"));
        }
        if self.alert_class.is_empty() {
            return Err(invalid("alert_class", "must not be empty"));
        }

        if self.max_depth == 0 {
            tracing::warn!("max_depth is 0; nested containers will not be traversed");
        }

        Ok(())
    }
}
