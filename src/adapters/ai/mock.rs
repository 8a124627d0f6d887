//! Scriptable AI service double for tests.
//!
//! Implements both AI ports against in-memory scripts so handler and
//! integration tests run without a live service. Turn replies are
//! consumed in order; calls are recorded for verification.
//!
//! # Example
//!
//! ```ignore
//! let ai = MockAiService::new()
//!     .with_greeting("Welcome!")
//!     .with_turns(vec![reply_one, reply_two]);
//!
//! let start = ai.start_session("Company: Acme").await?;
//! assert_eq!(ai.sessions_started(), 1);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::conversation::CompletionSignal;
use crate::domain::foundation::AiSessionId;
use crate::domain::summary::schema_template;
use crate::ports::{
    AiAnalyst, AiConversationClient, AiServiceError, AnalysisRequest, SessionStart, TurnReply,
};

/// Scriptable in-memory implementation of both AI ports.
#[derive(Debug, Clone)]
pub struct MockAiService {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    greeting: String,
    turns: VecDeque<TurnReply>,
    analysis: Option<Value>,
    failing: bool,
    session_contexts: Vec<String>,
    analysis_requests: Vec<AnalysisRequest>,
}

impl Default for MockAiService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiService {
    /// Creates a mock with default behavior: a canned greeting,
    /// continue-signal turns, and a conformant analysis.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                greeting: "Hello! Let's begin the survey.".to_string(),
                turns: VecDeque::new(),
                analysis: None,
                failing: false,
                session_contexts: Vec::new(),
                analysis_requests: Vec::new(),
            })),
        }
    }

    /// Sets the greeting returned when a session opens.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Self {
        self.inner.lock().unwrap().greeting = greeting.into();
        self
    }

    /// Queues turn replies, consumed in order by `advance`.
    pub fn with_turns(self, turns: Vec<TurnReply>) -> Self {
        self.inner.lock().unwrap().turns.extend(turns);
        self
    }

    /// Sets the value returned by `analyze`.
    pub fn with_analysis(self, analysis: Value) -> Self {
        self.inner.lock().unwrap().analysis = Some(analysis);
        self
    }

    /// Makes every call fail with a network error.
    pub fn failing(self) -> Self {
        self.inner.lock().unwrap().failing = true;
        self
    }

    /// Context string of the most recently opened session.
    pub fn last_session_context(&self) -> Option<String> {
        self.inner.lock().unwrap().session_contexts.last().cloned()
    }

    /// Number of sessions opened.
    pub fn sessions_started(&self) -> usize {
        self.inner.lock().unwrap().session_contexts.len()
    }

    /// Number of analysis calls made.
    pub fn analysis_calls(&self) -> usize {
        self.inner.lock().unwrap().analysis_requests.len()
    }

    /// The most recent analysis request.
    pub fn last_analysis_request(&self) -> Option<AnalysisRequest> {
        self.inner.lock().unwrap().analysis_requests.last().cloned()
    }
}

#[async_trait]
impl AiConversationClient for MockAiService {
    async fn start_session(&self, context: &str) -> Result<SessionStart, AiServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing {
            return Err(AiServiceError::Network("mock failure".to_string()));
        }
        inner.session_contexts.push(context.to_string());
        Ok(SessionStart {
            session: AiSessionId::new(format!("mock-session-{}", inner.session_contexts.len())),
            greeting: inner.greeting.clone(),
        })
    }

    async fn advance(
        &self,
        _session: &AiSessionId,
        _message: &str,
    ) -> Result<TurnReply, AiServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing {
            return Err(AiServiceError::Network("mock failure".to_string()));
        }
        Ok(inner.turns.pop_front().unwrap_or(TurnReply {
            reply: "Tell me more.".to_string(),
            signal: CompletionSignal::Continue,
            payload: None,
        }))
    }
}

#[async_trait]
impl AiAnalyst for MockAiService {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, AiServiceError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing {
            return Err(AiServiceError::Network("mock failure".to_string()));
        }
        inner.analysis_requests.push(request.clone());
        Ok(inner
            .analysis
            .clone()
            .unwrap_or_else(|| schema_template().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn sessions_are_recorded_with_context() {
        let ai = MockAiService::new().with_greeting("Welcome!");

        let start = ai.start_session("Company: Acme").await.unwrap();

        assert_eq!(start.greeting, "Welcome!");
        assert_eq!(ai.sessions_started(), 1);
        assert_eq!(ai.last_session_context().unwrap(), "Company: Acme");
    }

    #[tokio::test]
    async fn turns_are_consumed_in_order_then_default() {
        let ai = MockAiService::new().with_turns(vec![TurnReply {
            reply: "First".to_string(),
            signal: CompletionSignal::Continue,
            payload: None,
        }]);
        let session = AiSessionId::new("sess-1");

        let first = ai.advance(&session, "hi").await.unwrap();
        let second = ai.advance(&session, "hi").await.unwrap();

        assert_eq!(first.reply, "First");
        assert_eq!(second.reply, "Tell me more.");
    }

    #[tokio::test]
    async fn failing_mock_fails_every_port() {
        let ai = MockAiService::new().failing();
        let session = AiSessionId::new("sess-1");
        let request = AnalysisRequest {
            survey_title: "t".to_string(),
            company: None,
            total_participants: 0,
            completed_surveys: 0,
            in_progress_surveys: 0,
            participants: Vec::new(),
        };

        assert!(ai.start_session("ctx").await.is_err());
        assert!(ai.advance(&session, "hi").await.is_err());
        assert!(ai.analyze(&request).await.is_err());
        assert_eq!(ai.sessions_started(), 0);
    }

    #[tokio::test]
    async fn analysis_is_configurable_and_recorded() {
        let ai = MockAiService::new().with_analysis(json!({"total_participants": 7}));
        let request = AnalysisRequest {
            survey_title: "t".to_string(),
            company: None,
            total_participants: 7,
            completed_surveys: 3,
            in_progress_surveys: 4,
            participants: Vec::new(),
        };

        let value = ai.analyze(&request).await.unwrap();

        assert_eq!(value["total_participants"], 7);
        assert_eq!(ai.analysis_calls(), 1);
        assert_eq!(ai.last_analysis_request().unwrap().completed_surveys, 3);
    }
}
