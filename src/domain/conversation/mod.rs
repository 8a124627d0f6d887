//! Conversation progress tracking for survey respondents.
//!
//! # Module Organization
//!
//! - `state` - `ConversationState` entity and its value objects
//! - `tracker` - The turn-by-turn progress state machine

mod state;
mod tracker;

pub use state::{
    CompletedSchema, CompletionSignal, ConversationState, SchemaPayload, SurveyStatus,
};
pub use tracker::{ConversationTracker, TurnOutcome};
