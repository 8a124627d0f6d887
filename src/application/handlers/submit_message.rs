//! SubmitMessage command handler - the Turn Processor.
//!
//! Orchestrates one chat exchange: forwards the respondent's message to
//! the AI service, interprets the completion signal, and records the
//! turn against the conversation state. On upstream failure the state is
//! left untouched, so a retry is safe.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::catalog::SchemaCatalog;
use crate::domain::conversation::{
    CompletedSchema, CompletionSignal, ConversationTracker, SurveyStatus,
};
use crate::domain::foundation::RespondentId;
use crate::ports::{AiConversationClient, ConversationStore};

/// Command to submit one respondent message.
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    pub respondent_id: RespondentId,
    pub message: String,
}

impl SubmitMessageCommand {
    /// Creates a new submit message command.
    pub fn new(respondent_id: RespondentId, message: impl Into<String>) -> Self {
        Self {
            respondent_id,
            message: message.into(),
        }
    }
}

/// Errors that can occur when submitting a message.
#[derive(Debug, Clone, Error)]
pub enum SubmitMessageError {
    /// Message content is empty or whitespace only.
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// The respondent has no AI session.
    #[error("No AI session found for this respondent")]
    SessionNotFound,

    /// The respondent's survey is already completed.
    #[error("No active session: survey already completed")]
    NoActiveSession,

    /// The AI service was unreachable or replied out of contract.
    /// Conversation state is untouched; the turn may be retried.
    #[error("AI service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The store could not be read or written.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result of one processed turn.
#[derive(Debug, Clone)]
pub struct SubmitMessageResult {
    /// Assistant reply to show the respondent.
    pub reply: String,
    /// The AI's elicitation signal for this turn.
    pub signal: CompletionSignal,
    /// Schema completed by this turn, if the signal said so.
    pub completed_schema: Option<CompletedSchema>,
    /// False when a completed schema's identifier is not in the catalog.
    pub schema_recognized: bool,
    /// Respondent status after the turn.
    pub status: SurveyStatus,
}

impl SubmitMessageResult {
    /// True if this turn completed the whole survey.
    pub fn survey_completed(&self) -> bool {
        self.status == SurveyStatus::Completed
    }
}

/// Handler for SubmitMessage commands.
pub struct SubmitMessageHandler<S, A>
where
    S: ConversationStore,
    A: AiConversationClient,
{
    store: Arc<S>,
    ai: Arc<A>,
    catalog: Arc<SchemaCatalog>,
}

impl<S, A> SubmitMessageHandler<S, A>
where
    S: ConversationStore + 'static,
    A: AiConversationClient + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>, ai: Arc<A>, catalog: Arc<SchemaCatalog>) -> Self {
        Self { store, ai, catalog }
    }

    /// Handles a submit message command.
    #[instrument(skip(self, cmd), fields(respondent_id = %cmd.respondent_id))]
    pub async fn handle(
        &self,
        cmd: SubmitMessageCommand,
    ) -> Result<SubmitMessageResult, SubmitMessageError> {
        let message = cmd.message.trim();
        if message.is_empty() {
            return Err(SubmitMessageError::EmptyMessage);
        }

        let mut state = self
            .store
            .load_conversation(&cmd.respondent_id)
            .await
            .map_err(|e| SubmitMessageError::Store(e.to_string()))?
            .ok_or(SubmitMessageError::SessionNotFound)?;

        if !state.is_in_progress() {
            return Err(SubmitMessageError::NoActiveSession);
        }

        let turn = self
            .ai
            .advance(&state.session, message)
            .await
            .map_err(|e| {
                warn!(error = %e, "AI turn failed; conversation state untouched");
                SubmitMessageError::UpstreamUnavailable(e.to_string())
            })?;

        let tracker = ConversationTracker::new(&self.catalog);
        let outcome = tracker.record_turn(&mut state, turn.signal, turn.payload);

        self.store
            .save_conversation(&cmd.respondent_id, &state)
            .await
            .map_err(|e| SubmitMessageError::Store(e.to_string()))?;

        if let Some(schema) = &outcome.completed_schema {
            info!(
                schema_id = %schema.schema_id,
                recognized = outcome.schema_recognized,
                completed = state.completed_count(),
                "schema topic completed"
            );
        }

        Ok(SubmitMessageResult {
            reply: turn.reply,
            signal: turn.signal,
            completed_schema: outcome.completed_schema,
            schema_recognized: outcome.schema_recognized,
            status: outcome.status,
        })
    }
}
