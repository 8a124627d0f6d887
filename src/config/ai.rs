//! AI service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the two AI dependencies: the conversational survey
/// agent and the analysis model.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Base URL of the conversational survey agent
    #[serde(default = "default_agent_base_url")]
    pub agent_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Whether to verify TLS certificates when calling the agent
    #[serde(default)]
    pub verify_ssl: bool,

    /// Groq API key for the analysis model
    pub groq_api_key: Option<String>,

    /// Analysis model name
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Base URL of the analysis API
    #[serde(default = "default_groq_base_url")]
    pub groq_base_url: String,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the analysis model is configured
    pub fn has_analyst(&self) -> bool {
        self.groq_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.agent_base_url.starts_with("http://")
            && !self.agent_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidAgentUrl);
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            agent_base_url: default_agent_base_url(),
            timeout_secs: default_timeout(),
            verify_ssl: false,
            groq_api_key: None,
            groq_model: default_groq_model(),
            groq_base_url: default_groq_base_url(),
        }
    }
}

fn default_agent_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}
