//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `SURVEY_SHERPA_` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use survey_sherpa::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let catalog = config.survey.catalog();
//! ```

mod ai;
mod error;
mod survey;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use survey::SurveyConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has working defaults, so a bare environment yields a
/// config pointing at a local agent with no analysis key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI service configuration (survey agent, analysis model)
    #[serde(default)]
    pub ai: AiConfig,

    /// Survey progression configuration
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SURVEY_SHERPA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SURVEY_SHERPA__AI__AGENT_BASE_URL=http://agent:5001` -> `ai.agent_base_url`
    /// - `SURVEY_SHERPA__SURVEY__COMPLETION_TARGET=4` -> `survey.completion_target`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_SHERPA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.survey.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("SURVEY_SHERPA__AI__AGENT_BASE_URL");
        env::remove_var("SURVEY_SHERPA__AI__TIMEOUT_SECS");
        env::remove_var("SURVEY_SHERPA__AI__GROQ_API_KEY");
        env::remove_var("SURVEY_SHERPA__SURVEY__COMPLETION_TARGET");
        env::remove_var("SURVEY_SHERPA__SURVEY__COMPLETION_RULE");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.agent_base_url, "http://localhost:5001");
        assert!(config.survey.completion_target.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_SHERPA__AI__AGENT_BASE_URL", "http://agent:5001");
        env::set_var("SURVEY_SHERPA__AI__TIMEOUT_SECS", "10");
        env::set_var("SURVEY_SHERPA__AI__GROQ_API_KEY", "gsk-test");
        env::set_var("SURVEY_SHERPA__SURVEY__COMPLETION_TARGET", "4");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.agent_base_url, "http://agent:5001");
        assert_eq!(config.ai.timeout_secs, 10);
        assert!(config.ai.has_analyst());
        assert_eq!(config.survey.completion_target, Some(4));
    }

    #[test]
    fn test_completion_rule_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SURVEY_SHERPA__SURVEY__COMPLETION_RULE", "terminal_signal");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.survey.catalog().completion_rule(),
            crate::domain::catalog::CompletionRule::TerminalSignal
        );
    }
}
