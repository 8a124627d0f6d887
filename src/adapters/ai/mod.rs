//! AI service adapters.

mod groq_analyst;
mod mock;
mod survey_agent;

pub use groq_analyst::{GroqAnalyst, GroqAnalystConfig};
pub use mock::MockAiService;
pub use survey_agent::{SurveyAgentClient, SurveyAgentConfig};
