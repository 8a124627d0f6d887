//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AiConversationClient` - The conversational AI service driving each
//!   respondent's survey chat
//! - `AiAnalyst` - The AI analysis endpoint producing survey summaries
//! - `ConversationStore` - Persistence of per-respondent conversation state

mod ai_analyst;
mod ai_conversation;
mod conversation_store;

pub use ai_analyst::{AiAnalyst, AnalysisRequest, CompanyContext, ParticipantResponses};
pub use ai_conversation::{AiConversationClient, AiServiceError, SessionStart, TurnReply};
pub use conversation_store::{ConversationStore, RespondentProfile, RespondentRecord};
