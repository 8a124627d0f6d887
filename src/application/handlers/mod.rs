//! Command handlers.
//!
//! Each handler owns one operation: a command struct, a result struct,
//! and a handler generic over the ports it needs. Handlers are
//! request-scoped and hold no state of their own beyond `Arc`s to their
//! dependencies.

mod build_summary;
mod start_conversation;
mod submit_message;

pub use build_summary::{BuildSummaryCommand, BuildSummaryError, BuildSummaryHandler, SummaryEnvelope};
pub use start_conversation::{
    StartConversationCommand, StartConversationError, StartConversationHandler,
    StartConversationResult,
};
pub use submit_message::{
    SubmitMessageCommand, SubmitMessageError, SubmitMessageHandler, SubmitMessageResult,
};
