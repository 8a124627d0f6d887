//! AI Analyst Port - Interface to the survey analysis endpoint.
//!
//! Given every respondent's completed schemas, the analyst returns a
//! candidate summary as raw JSON. The reply is best-effort: it may be
//! partial, mistyped, or not JSON at all, and the summary validator is
//! responsible for absorbing that.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::conversation::{CompletedSchema, SurveyStatus};

use super::ai_conversation::AiServiceError;

/// Company details giving the analyst business context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyContext {
    pub name: String,
    pub sector: Option<String>,
    pub products: Option<String>,
    pub details: Option<String>,
}

/// One respondent's contribution to the analysis payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantResponses {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub status: SurveyStatus,
    pub responses: Vec<CompletedSchema>,
}

/// Aggregated payload sent to the analyst.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub survey_title: String,
    pub company: Option<CompanyContext>,
    pub total_participants: u64,
    pub completed_surveys: u64,
    pub in_progress_surveys: u64,
    pub participants: Vec<ParticipantResponses>,
}

/// Port for the AI analysis service.
#[async_trait]
pub trait AiAnalyst: Send + Sync {
    /// Requests an analytical summary of the aggregated survey data.
    ///
    /// Returns whatever the AI produced, decoded as JSON when possible;
    /// when the reply body is not valid JSON, implementations return it
    /// as a bare `Value::String` so the validator can report it rather
    /// than losing the response. Errors are reserved for transport and
    /// protocol failures.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, AiServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_request_serializes_for_prompting() {
        let request = AnalysisRequest {
            survey_title: "Platform adoption".to_string(),
            company: Some(CompanyContext {
                name: "Acme".to_string(),
                sector: Some("Logistics".to_string()),
                products: None,
                details: None,
            }),
            total_participants: 2,
            completed_surveys: 1,
            in_progress_surveys: 1,
            participants: vec![ParticipantResponses {
                name: "Dana".to_string(),
                age: 41,
                gender: "female".to_string(),
                status: SurveyStatus::Completed,
                responses: Vec::new(),
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["company"]["name"], "Acme");
        assert_eq!(value["participants"][0]["status"], json!("completed"));
    }
}
