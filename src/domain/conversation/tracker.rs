//! Conversation Tracker - the per-respondent progress state machine.
//!
//! Decides when a schema topic is complete, accumulates completed schemas
//! in arrival order, and recomputes the respondent's coarse status per
//! the catalog's completion rule. The tracker never persists anything
//! itself; callers hand the updated snapshot to the store.

use tracing::warn;

use crate::domain::catalog::{CompletionRule, SchemaCatalog};
use crate::domain::foundation::{AiSessionId, DomainError};

use super::state::{
    CompletedSchema, CompletionSignal, ConversationState, SchemaPayload, SurveyStatus,
};

/// Result of recording one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The completed schema appended by this turn, if any.
    pub completed_schema: Option<CompletedSchema>,
    /// False when the appended schema's identifier is not in the
    /// catalog. Advisory only; the entry is appended regardless.
    pub schema_recognized: bool,
    /// Coarse status after the turn.
    pub status: SurveyStatus,
}

/// Progress state machine over a fixed schema catalog.
pub struct ConversationTracker<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> ConversationTracker<'a> {
    /// Creates a tracker over the given catalog.
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Initializes conversation state for a respondent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the respondent already has a session;
    /// a conversation is started at most once per respondent.
    pub fn start(
        &self,
        existing: Option<&ConversationState>,
        session: AiSessionId,
    ) -> Result<ConversationState, DomainError> {
        if let Some(state) = existing {
            return Err(DomainError::invalid_state(format!(
                "respondent already has AI session {}",
                state.session
            )));
        }
        Ok(ConversationState::new(session))
    }

    /// Records one chat turn against the state.
    ///
    /// A non-completion signal leaves the state untouched (the transcript
    /// itself is owned by an external collaborator). A schema-completion
    /// signal appends the payload verbatim, even when its identifier is
    /// not in the catalog, and recomputes the coarse status.
    pub fn record_turn(
        &self,
        state: &mut ConversationState,
        signal: CompletionSignal,
        payload: Option<SchemaPayload>,
    ) -> TurnOutcome {
        let mut completed_schema = None;
        let mut schema_recognized = true;

        if signal.completes_schema() {
            if let Some(payload) = payload {
                schema_recognized = self.catalog.recognizes(&payload.schema_id);
                if !schema_recognized {
                    warn!(
                        schema_id = %payload.schema_id,
                        "completed schema identifier not in catalog; appending verbatim"
                    );
                }
                let schema = CompletedSchema::from_payload(payload);
                state.append_completed(schema.clone());
                completed_schema = Some(schema);
            } else {
                // Completion signal without a payload: nothing to record.
                warn!("schema completion signal carried no payload");
            }
        }

        state.set_status(self.status_after(state, signal));

        TurnOutcome {
            completed_schema,
            schema_recognized,
            status: state.status(),
        }
    }

    fn status_after(&self, state: &ConversationState, signal: CompletionSignal) -> SurveyStatus {
        match self.catalog.completion_rule() {
            CompletionRule::SchemaCount => {
                if state.completed_count() >= self.catalog.completion_target() {
                    SurveyStatus::Completed
                } else {
                    SurveyStatus::InProgress
                }
            }
            CompletionRule::TerminalSignal => {
                if state.status() == SurveyStatus::Completed
                    || signal == CompletionSignal::SurveyCompleted
                {
                    SurveyStatus::Completed
                } else {
                    SurveyStatus::InProgress
                }
            }
        }
    }
}
