//! # Configuration Module
//!
//! Runtime configuration read from the environment (after `.env` loading in
//! the binary), with defaults for everything that has one.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ServiceError;
use crate::image_search::UnsplashClient;
use crate::llm::GeminiProvider;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_DATA_FILE: &str = "meal-planner.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_VAR: &str = "GEMINI_MODEL";
pub const UNSPLASH_ACCESS_KEY_VAR: &str = "UNSPLASH_ACCESS_KEY";
pub const DATA_FILE_VAR: &str = "MEAL_PLANNER_DATA";
pub const REQUEST_TIMEOUT_VAR: &str = "REQUEST_TIMEOUT_SECS";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Gemini API key; AI features are unavailable without it
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Unsplash access key; photo lookup is unavailable without it
    pub unsplash_access_key: Option<String>,
    /// JSON file holding the planner state
    pub data_file: PathBuf,
    /// Timeout applied to every outgoing request
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            unsplash_access_key: None,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let request_timeout = match var(REQUEST_TIMEOUT_VAR) {
            Some(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .with_context(|| format!("{REQUEST_TIMEOUT_VAR} must be a whole number of seconds, got '{secs}'"))?,
            ),
            None => defaults.request_timeout,
        };

        Ok(Self {
            gemini_api_key: var(GEMINI_API_KEY_VAR),
            gemini_model: var(GEMINI_MODEL_VAR).unwrap_or(defaults.gemini_model),
            unsplash_access_key: var(UNSPLASH_ACCESS_KEY_VAR),
            data_file: var(DATA_FILE_VAR).map(PathBuf::from).unwrap_or(defaults.data_file),
            request_timeout,
        })
    }

    /// Build the Gemini provider
    pub fn text_generator(&self) -> Result<GeminiProvider, ServiceError> {
        let key = self
            .gemini_api_key
            .clone()
            .ok_or(ServiceError::MissingApiKey(GEMINI_API_KEY_VAR))?;
        GeminiProvider::new(key, self.gemini_model.clone(), self.request_timeout)
    }

    /// Build the Unsplash client
    pub fn image_search(&self) -> Result<UnsplashClient, ServiceError> {
        let key = self
            .unsplash_access_key
            .clone()
            .ok_or(ServiceError::MissingApiKey(UNSPLASH_ACCESS_KEY_VAR))?;
        UnsplashClient::new(key, self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (GEMINI_API_KEY_VAR, "abc"),
            (GEMINI_MODEL_VAR, "gemini-pro"),
            (DATA_FILE_VAR, "/tmp/plan.json"),
            (REQUEST_TIMEOUT_VAR, "5"),
            (UNSPLASH_ACCESS_KEY_VAR, "  "),
        ]))
        .unwrap();

        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.data_file, PathBuf::from("/tmp/plan.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.unsplash_access_key.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(AppConfig::from_lookup(lookup(&[(REQUEST_TIMEOUT_VAR, "soon")])).is_err());
    }

    #[test]
    fn test_missing_keys_disable_services() {
        let config = AppConfig::default();
        assert!(matches!(
            config.text_generator(),
            Err(ServiceError::MissingApiKey(GEMINI_API_KEY_VAR))
        ));
        assert!(matches!(
            config.image_search(),
            Err(ServiceError::MissingApiKey(UNSPLASH_ACCESS_KEY_VAR))
        ));
    }
}
