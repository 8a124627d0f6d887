//! Conversation Store Port - Persistence of conversation state.
//!
//! The core never persists anything itself; it emits updated
//! `ConversationState` snapshots through this port. Respondent rows and
//! their demographics are owned by the surrounding system.
//!
//! # Concurrency contract
//!
//! Implementations must serialize turns per respondent (a per-row lock
//! or optimistic version check). The core assumes at most one in-flight
//! turn per respondent and does not lock itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{DomainError, RespondentId, SurveyId};

/// Demographic fields attached to a respondent row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondentProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
}

/// A respondent row as seen by the aggregation path.
#[derive(Debug, Clone, PartialEq)]
pub struct RespondentRecord {
    pub respondent_id: RespondentId,
    pub profile: RespondentProfile,
    pub state: ConversationState,
}

/// Port for loading and saving conversation state.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Loads a respondent's conversation state.
    ///
    /// Returns `Ok(None)` when the respondent has no session yet.
    async fn load_conversation(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<Option<ConversationState>, DomainError>;

    /// Persists a respondent's conversation state snapshot.
    async fn save_conversation(
        &self,
        respondent_id: &RespondentId,
        state: &ConversationState,
    ) -> Result<(), DomainError>;

    /// Lists every respondent of a survey that has a conversation.
    async fn list_respondents(
        &self,
        survey_id: &SurveyId,
    ) -> Result<Vec<RespondentRecord>, DomainError>;
}
