//! In-memory implementation of ConversationStore.
//!
//! Backs tests and single-process deployments. Respondent rows and their
//! demographics normally live in the surrounding system's database; here
//! they are registered explicitly so the aggregation path has something
//! to list.
//!
//! The coarse mutex satisfies the port's concurrency contract: turns for
//! the same respondent can never interleave mid-save.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::{DomainError, RespondentId, SurveyId};
use crate::ports::{ConversationStore, RespondentProfile, RespondentRecord};

#[derive(Debug, Clone)]
struct Row {
    survey_id: Option<SurveyId>,
    profile: Option<RespondentProfile>,
    state: Option<ConversationState>,
}

/// In-memory conversation store.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    rows: Mutex<Rows>,
}

#[derive(Debug, Default)]
struct Rows {
    by_respondent: HashMap<RespondentId, Row>,
    // Registration order, so listings are deterministic.
    order: Vec<RespondentId>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a respondent row for a survey.
    ///
    /// Mirrors the row the surrounding system would create before the
    /// conversation starts. A conversation saved for an unregistered
    /// respondent is still loadable but belongs to no survey listing.
    pub fn register_respondent(
        &self,
        survey_id: SurveyId,
        respondent_id: RespondentId,
        profile: RespondentProfile,
    ) {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.by_respondent.entry(respondent_id).or_insert(Row {
            survey_id: None,
            profile: None,
            state: None,
        });
        row.survey_id = Some(survey_id);
        row.profile = Some(profile);
        if !rows.order.contains(&respondent_id) {
            rows.order.push(respondent_id);
        }
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load_conversation(
        &self,
        respondent_id: &RespondentId,
    ) -> Result<Option<ConversationState>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .by_respondent
            .get(respondent_id)
            .and_then(|row| row.state.clone()))
    }

    async fn save_conversation(
        &self,
        respondent_id: &RespondentId,
        state: &ConversationState,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.by_respondent.entry(*respondent_id).or_insert(Row {
            survey_id: None,
            profile: None,
            state: None,
        });
        row.state = Some(state.clone());
        if !rows.order.contains(respondent_id) {
            rows.order.push(*respondent_id);
        }
        Ok(())
    }

    async fn list_respondents(
        &self,
        survey_id: &SurveyId,
    ) -> Result<Vec<RespondentRecord>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .order
            .iter()
            .filter_map(|id| {
                let row = rows.by_respondent.get(id)?;
                if row.survey_id.as_ref() != Some(survey_id) {
                    return None;
                }
                Some(RespondentRecord {
                    respondent_id: *id,
                    profile: row.profile.clone()?,
                    state: row.state.clone()?,
                })
            })
            .collect())
    }
}
