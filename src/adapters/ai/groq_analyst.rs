//! Groq Analyst - Implementation of AiAnalyst over an OpenAI-compatible
//! chat completions API.
//!
//! Sends the aggregated survey data plus the summary contract to a chat
//! model and asks for pure JSON back. The model is requested in JSON
//! mode, but the reply is still treated as untrusted: bodies that fail
//! to decode are returned as a bare string for the validator to report.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::domain::summary::schema_template;
use crate::ports::{AiAnalyst, AiServiceError, AnalysisRequest};

/// Configuration for the Groq analyst.
#[derive(Debug, Clone)]
pub struct GroqAnalystConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (default: llama-3.3-70b-versatile).
    pub model: String,
    /// Base URL for the API (default: https://api.groq.com/openai/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GroqAnalystConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.3-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Chat-completions analyst implementation.
pub struct GroqAnalyst {
    config: GroqAnalystConfig,
    client: Client,
}

impl GroqAnalyst {
    /// Creates a new analyst with the given configuration.
    pub fn new(config: GroqAnalystConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_prompt(request: &AnalysisRequest) -> Result<String, AiServiceError> {
        let data = serde_json::to_string_pretty(request)
            .map_err(|e| AiServiceError::MalformedReply(e.to_string()))?;
        let contract = serde_json::to_string_pretty(schema_template())
            .map_err(|e| AiServiceError::MalformedReply(e.to_string()))?;

        Ok(format!(
            "Analyze the following survey data and produce a summary as a \
             JSON object with exactly this structure:\n\n{}\n\nCount values \
             must be integers, percentage values numbers between 0 and 100, \
             list values arrays of strings, and text values plain strings. \
             Respond with the JSON object only, no surrounding prose.\n\n\
             Survey data:\n{}",
            contract, data
        ))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> AiServiceError {
        if e.is_timeout() {
            AiServiceError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            AiServiceError::Network(format!("Connection failed: {}", e))
        } else {
            AiServiceError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl AiAnalyst for GroqAnalyst {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, AiServiceError> {
        let chat_request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are an expert market research analyst. You respond \
                              with pure JSON matching the requested structure, with \
                              no markdown and no commentary."
                        .to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_prompt(request)?,
                },
            ],
            temperature: 0.2,
            max_tokens: 2000,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiServiceError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiServiceError::MalformedReply(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiServiceError::MalformedReply("no choices in response".to_string()))?;

        debug!(bytes = content.len(), "analysis reply received");

        // Non-JSON content is handed to the validator rather than dropped.
        Ok(serde_json::from_str(&content).unwrap_or(Value::String(content)))
    }
}

// ----- Chat Completions API Types -----

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::SurveyStatus;
    use crate::ports::ParticipantResponses;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            survey_title: "Platform adoption".to_string(),
            company: None,
            total_participants: 1,
            completed_surveys: 1,
            in_progress_surveys: 0,
            participants: vec![ParticipantResponses {
                name: "Dana".to_string(),
                age: 41,
                gender: "female".to_string(),
                status: SurveyStatus::Completed,
                responses: Vec::new(),
            }],
        }
    }

    #[test]
    fn config_defaults_target_groq() {
        let config = GroqAnalystConfig::new("gsk-test");

        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.api_key(), "gsk-test");
    }

    #[test]
    fn prompt_carries_contract_and_data() {
        let prompt = GroqAnalyst::build_prompt(&request()).unwrap();

        assert!(prompt.contains("completion_rate_percentage"));
        assert!(prompt.contains("Platform adoption"));
        assert!(prompt.contains("Dana"));
    }

    #[test]
    fn chat_request_serializes_json_mode() {
        let request = ChatCompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: Vec::new(),
            temperature: 0.2,
            max_tokens: 2000,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["max_tokens"], 2000);
    }
}
