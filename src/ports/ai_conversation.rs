//! AI Conversation Port - Interface to the conversational AI service.
//!
//! The AI service owns the survey dialogue: it issues session tokens,
//! produces every assistant reply, and signals when a schema topic has
//! been fully elicited. This port treats it as an opaque oracle; the
//! core imposes structure on whatever comes back.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{CompletionSignal, SchemaPayload};
use crate::domain::foundation::AiSessionId;

/// Result of opening a new AI conversation session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStart {
    /// Opaque token identifying the session for subsequent turns.
    pub session: AiSessionId,
    /// The AI's opening message to the respondent.
    pub greeting: String,
}

/// One AI reply to a respondent message.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    /// Assistant text to show the respondent.
    pub reply: String,
    /// Elicitation progress signal for this turn.
    pub signal: CompletionSignal,
    /// Schema payload accompanying a completion signal, if any.
    pub payload: Option<SchemaPayload>,
}

/// Errors from the AI service at the protocol level.
///
/// All variants surface to the domain as `UpstreamUnavailable`; the
/// distinction exists for logging and retry heuristics.
#[derive(Debug, Clone, Error)]
pub enum AiServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("AI service returned status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("AI service returned a malformed reply: {0}")]
    MalformedReply(String),
}

/// Port for the conversational AI service.
#[async_trait]
pub trait AiConversationClient: Send + Sync {
    /// Starts a new conversation session.
    ///
    /// `context` is the company/survey/respondent briefing that primes
    /// the AI before the first turn.
    async fn start_session(&self, context: &str) -> Result<SessionStart, AiServiceError>;

    /// Sends one respondent message and returns the AI's reply.
    async fn advance(
        &self,
        session: &AiSessionId,
        message: &str,
    ) -> Result<TurnReply, AiServiceError>;
}
