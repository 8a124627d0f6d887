//! The strictly-typed analytical summary.

use serde::{Deserialize, Serialize};

/// Validated analytical output of a survey analysis.
///
/// Every field is present with its declared type in any record that
/// leaves this crate; there is no partially-valid summary observable
/// outside the validator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub total_participants: u64,
    pub completed_surveys: u64,
    pub in_progress_surveys: u64,
    pub completion_rate_percentage: f64,
    pub positive_indicators: u64,
    pub negative_indicators: u64,
    pub top_keywords: Vec<String>,
    pub key_pain_points: Vec<String>,
    pub common_workflows: Vec<String>,
    pub technology_trends: Vec<String>,
    pub main_bottlenecks: Vec<String>,
    pub budget_insights: String,
    pub security_concerns: Vec<String>,
    pub deployment_preferences: Vec<String>,
    pub key_insights: String,
    pub recommendations: String,
}

/// Rounds to 2 decimal places, the precision of the reported rate.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl SummaryRecord {
    /// Deterministic summary used when the AI cannot be consulted or
    /// returns nothing usable. Participation counters are real; analytic
    /// fields carry fixed guidance text.
    pub fn fallback(total_participants: u64, completed_surveys: u64) -> Self {
        let completion_rate = if total_participants > 0 {
            round2(completed_surveys as f64 / total_participants as f64 * 100.0)
        } else {
            0.0
        };

        Self {
            total_participants,
            completed_surveys,
            in_progress_surveys: total_participants.saturating_sub(completed_surveys),
            completion_rate_percentage: completion_rate,
            positive_indicators: 0,
            negative_indicators: 0,
            top_keywords: vec!["No data available".to_string()],
            key_pain_points: vec!["Insufficient data for analysis".to_string()],
            common_workflows: Vec::new(),
            technology_trends: Vec::new(),
            main_bottlenecks: Vec::new(),
            budget_insights: "Insufficient data to provide budget insights.".to_string(),
            security_concerns: Vec::new(),
            deployment_preferences: Vec::new(),
            key_insights: "Not enough survey responses to generate meaningful insights. \
                           Please wait for more participants to complete the survey."
                .to_string(),
            recommendations: "Collect more survey responses before analyzing trends and \
                              making recommendations. Aim for at least 5-10 completed surveys."
                .to_string(),
        }
    }
}
