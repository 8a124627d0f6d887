//! StartConversation command handler.
//!
//! Registers a respondent with the AI service: builds the context
//! briefing from company, survey, and respondent details, opens an AI
//! session, and creates the initial conversation state.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::catalog::SchemaCatalog;
use crate::domain::conversation::{ConversationState, ConversationTracker};
use crate::domain::foundation::RespondentId;
use crate::ports::{AiConversationClient, CompanyContext, ConversationStore, RespondentProfile};

/// Command to start a survey conversation for a respondent.
#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    pub respondent_id: RespondentId,
    pub respondent: RespondentProfile,
    pub survey_title: String,
    pub survey_description: Option<String>,
    pub company: Option<CompanyContext>,
}

impl StartConversationCommand {
    /// Assembles the context briefing sent to the AI when the session
    /// opens: company details first, then respondent and survey.
    fn build_context(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(company) = &self.company {
            parts.push(format!("Company: {}", company.name));
            if let Some(sector) = &company.sector {
                parts.push(format!("Sector: {}", sector));
            }
            if let Some(products) = &company.products {
                parts.push(format!("Products: {}", products));
            }
            if let Some(details) = &company.details {
                parts.push(format!("Details: {}", details));
            }
        }

        parts.push(format!("Customer: {}", self.respondent.name));
        parts.push(format!("Age: {}", self.respondent.age));
        parts.push(format!("Gender: {}", self.respondent.gender));
        parts.push(format!("Survey: {}", self.survey_title));
        if let Some(description) = &self.survey_description {
            parts.push(format!("Survey Description: {}", description));
        }

        parts.join(" | ")
    }
}

/// Errors that can occur when starting a conversation.
#[derive(Debug, Clone, Error)]
pub enum StartConversationError {
    /// The respondent already has an AI session.
    #[error("Respondent already has an active AI session")]
    AlreadyStarted,

    /// The AI service could not open a session.
    #[error("Failed to start AI session: {0}")]
    Upstream(String),

    /// The store could not be read or written.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    /// The AI's opening message to show the respondent.
    pub greeting: String,
    /// Freshly created conversation state (already persisted).
    pub state: ConversationState,
}

/// Handler for StartConversation commands.
pub struct StartConversationHandler<S, A>
where
    S: ConversationStore,
    A: AiConversationClient,
{
    store: Arc<S>,
    ai: Arc<A>,
    catalog: Arc<SchemaCatalog>,
}

impl<S, A> StartConversationHandler<S, A>
where
    S: ConversationStore + 'static,
    A: AiConversationClient + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<S>, ai: Arc<A>, catalog: Arc<SchemaCatalog>) -> Self {
        Self { store, ai, catalog }
    }

    /// Handles a start conversation command.
    ///
    /// The existing-session check happens before the upstream call, so a
    /// duplicate registration never opens a stray AI session.
    #[instrument(skip(self, cmd), fields(respondent_id = %cmd.respondent_id))]
    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, StartConversationError> {
        let existing = self
            .store
            .load_conversation(&cmd.respondent_id)
            .await
            .map_err(|e| StartConversationError::Store(e.to_string()))?;

        if existing.is_some() {
            return Err(StartConversationError::AlreadyStarted);
        }

        let context = cmd.build_context();
        let session_start = self
            .ai
            .start_session(&context)
            .await
            .map_err(|e| StartConversationError::Upstream(e.to_string()))?;

        let tracker = ConversationTracker::new(&self.catalog);
        let state = tracker
            .start(existing.as_ref(), session_start.session)
            .map_err(|_| StartConversationError::AlreadyStarted)?;

        self.store
            .save_conversation(&cmd.respondent_id, &state)
            .await
            .map_err(|e| StartConversationError::Store(e.to_string()))?;

        info!(respondent_id = %cmd.respondent_id, "survey conversation started");

        Ok(StartConversationResult {
            greeting: session_start.greeting,
            state,
        })
    }
}
