//! Shared domain primitives.
//!
//! Value objects and errors used across the domain layer.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{AiSessionId, RespondentId, SurveyId};
pub use timestamp::Timestamp;
