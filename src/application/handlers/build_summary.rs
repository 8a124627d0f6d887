//! BuildSummary command handler - the Aggregation Reporter.
//!
//! Combines participation counters with the AI analyst's output, runs
//! the result through the summary validator, and wraps everything in a
//! type-stable envelope. Upstream failure on this path is absorbed into
//! a deterministic fallback summary; it is never surfaced as an error.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::domain::conversation::SurveyStatus;
use crate::domain::foundation::SurveyId;
use crate::domain::summary::{SummaryRecord, SummaryValidator};
use crate::ports::{
    AiAnalyst, AnalysisRequest, CompanyContext, ConversationStore, ParticipantResponses,
};

/// Command to build the analytical summary for a survey.
#[derive(Debug, Clone)]
pub struct BuildSummaryCommand {
    pub survey_id: SurveyId,
    pub survey_title: String,
    pub company: Option<CompanyContext>,
}

/// Errors that can occur when building a summary.
///
/// Analyst failures are deliberately absent: that path degrades to the
/// fallback summary instead of failing.
#[derive(Debug, Clone, Error)]
pub enum BuildSummaryError {
    /// The store could not list the survey's respondents.
    #[error("Store error: {0}")]
    Store(String),
}

/// Caller-facing summary envelope.
///
/// The shape is identical on every path; callers never see a partial
/// summary or an analyst error as a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEnvelope {
    pub summary: SummaryRecord,
    /// True iff the AI response matched the contract without correction.
    pub schema_validated: bool,
    /// Deviation messages, or null when the response needed no repair.
    pub validation_errors: Option<Vec<String>>,
    /// True when the summary is the deterministic fallback.
    pub fallback: bool,
    /// Upstream error description when the analyst could not be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryEnvelope {
    fn fallback(summary: SummaryRecord, error: Option<String>) -> Self {
        Self {
            summary,
            schema_validated: false,
            validation_errors: None,
            fallback: true,
            error,
        }
    }
}

/// Handler for BuildSummary commands.
pub struct BuildSummaryHandler<S, A>
where
    S: ConversationStore,
    A: AiAnalyst,
{
    store: Arc<S>,
    analyst: Arc<A>,
    validator: SummaryValidator,
}

impl<S, A> BuildSummaryHandler<S, A>
where
    S: ConversationStore + 'static,
    A: AiAnalyst + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>, analyst: Arc<A>) -> Self {
        Self {
            store,
            analyst,
            validator: SummaryValidator::new(),
        }
    }

    /// Handles a build summary command.
    #[instrument(skip(self, cmd), fields(survey_id = %cmd.survey_id))]
    pub async fn handle(
        &self,
        cmd: BuildSummaryCommand,
    ) -> Result<SummaryEnvelope, BuildSummaryError> {
        let respondents = self
            .store
            .list_respondents(&cmd.survey_id)
            .await
            .map_err(|e| BuildSummaryError::Store(e.to_string()))?;

        let total = respondents.len() as u64;
        let completed = respondents
            .iter()
            .filter(|r| r.state.status() == SurveyStatus::Completed)
            .count() as u64;

        if respondents.is_empty() {
            // Nothing to analyze; skip the upstream call entirely.
            return Ok(SummaryEnvelope::fallback(
                SummaryRecord::fallback(0, 0),
                None,
            ));
        }

        let request = AnalysisRequest {
            survey_title: cmd.survey_title,
            company: cmd.company,
            total_participants: total,
            completed_surveys: completed,
            in_progress_surveys: total - completed,
            participants: respondents
                .iter()
                .filter(|r| r.state.completed_count() > 0)
                .map(|r| ParticipantResponses {
                    name: r.profile.name.clone(),
                    age: r.profile.age,
                    gender: r.profile.gender.clone(),
                    status: r.state.status(),
                    responses: r.state.completed_schemas().to_vec(),
                })
                .collect(),
        };

        let raw = match self.analyst.analyze(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "analyst unavailable; returning fallback summary");
                return Ok(SummaryEnvelope::fallback(
                    SummaryRecord::fallback(total, completed),
                    Some(format!("AI service error: {}", e)),
                ));
            }
        };

        let outcome = self.validator.validate(&raw);
        if !outcome.conformant {
            warn!(
                deviations = outcome.deviations.len(),
                "analyst response sanitized"
            );
        }

        Ok(SummaryEnvelope {
            summary: outcome.summary,
            schema_validated: outcome.conformant,
            validation_errors: if outcome.deviations.is_empty() {
                None
            } else {
                Some(outcome.deviations)
            },
            fallback: false,
            error: None,
        })
    }
}
