//! Survey Agent Client - HTTP implementation of AiConversationClient.
//!
//! Talks to the conversational microservice that drives each
//! respondent's survey chat. The service exposes two endpoints:
//! `POST /api/start_session` taking a context briefing, and
//! `POST /api/chat` taking a session token and the respondent's message.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SurveyAgentConfig::new("http://localhost:5001")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_verify_ssl(false);
//!
//! let client = SurveyAgentClient::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::domain::conversation::{CompletionSignal, SchemaPayload};
use crate::domain::foundation::AiSessionId;
use crate::ports::{AiConversationClient, AiServiceError, SessionStart, TurnReply};

/// Configuration for the survey agent client.
#[derive(Debug, Clone)]
pub struct SurveyAgentConfig {
    /// Base URL of the agent service (default: http://localhost:5001).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Whether to verify TLS certificates. Off by default because the
    /// agent usually runs alongside this service with a self-signed cert.
    pub verify_ssl: bool,
}

impl Default for SurveyAgentConfig {
    fn default() -> Self {
        Self::new("http://localhost:5001")
    }
}

impl SurveyAgentConfig {
    /// Creates a new configuration pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            verify_ssl: false,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets TLS certificate verification.
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }
}

/// HTTP client for the conversational survey agent.
pub struct SurveyAgentClient {
    config: SurveyAgentConfig,
    client: Client,
}

impl SurveyAgentClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: SurveyAgentConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
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

    async fn check_status(&self, response: Response) -> Result<Response, AiServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AiServiceError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AiConversationClient for SurveyAgentClient {
    async fn start_session(&self, context: &str) -> Result<SessionStart, AiServiceError> {
        let response = self
            .client
            .post(self.url("/api/start_session"))
            .json(&StartSessionRequest { context })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;

        let body: StartSessionResponse = response
            .json()
            .await
            .map_err(|e| AiServiceError::MalformedReply(e.to_string()))?;

        debug!(session_id = %body.session_id, "AI session opened");

        Ok(SessionStart {
            session: AiSessionId::new(body.session_id),
            greeting: body.response,
        })
    }

    async fn advance(
        &self,
        session: &AiSessionId,
        message: &str,
    ) -> Result<TurnReply, AiServiceError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&ChatRequest {
                session_id: session.as_str(),
                user_input: message,
            })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let response = self.check_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiServiceError::MalformedReply(e.to_string()))?;

        let signal = CompletionSignal::from_status(body.status).ok_or_else(|| {
            AiServiceError::MalformedReply(format!("unknown status value {}", body.status))
        })?;

        // Comments ride along only when the agent closed a topic.
        let payload = match (signal.completes_schema(), body.comments) {
            (true, Some(raw)) => Some(SchemaPayload::from_value(raw)),
            _ => None,
        };

        Ok(TurnReply {
            reply: body.response,
            signal,
            payload,
        })
    }
}

// ----- Agent API Types -----

#[derive(Debug, Serialize)]
struct StartSessionRequest<'a> {
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct StartSessionResponse {
    session_id: String,
    response: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    user_input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
    status: i64,
    #[serde(default)]
    comments: Option<Value>,
}
