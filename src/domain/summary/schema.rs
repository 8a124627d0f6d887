//! Summary Schema Definition - the 16-field analytical summary contract.
//!
//! The contract is modeled as a closed set of typed field descriptors,
//! each tagged with its coercion rule. The validator is a single pass
//! over this set, so adding a field is a one-line descriptor change plus
//! a matching arm in the record assignment.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Coercion rule for one summary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer count.
    Count,
    /// Float clamped to [0, 100], rounded to 2 decimal places.
    Percentage,
    /// Array of non-blank strings, optionally with a minimum length.
    StringList { min_items: Option<usize> },
    /// Free text, optionally bounded to a character range after trimming.
    Text { bounds: Option<(usize, usize)> },
}

/// Descriptor for one field of the summary contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Every field the AI must return, in contract order. All are required.
pub const SUMMARY_FIELDS: [FieldSpec; 16] = [
    field("total_participants", FieldKind::Count),
    field("completed_surveys", FieldKind::Count),
    field("in_progress_surveys", FieldKind::Count),
    field("completion_rate_percentage", FieldKind::Percentage),
    field("positive_indicators", FieldKind::Count),
    field("negative_indicators", FieldKind::Count),
    field("top_keywords", FieldKind::StringList { min_items: Some(3) }),
    field("key_pain_points", FieldKind::StringList { min_items: Some(2) }),
    field("common_workflows", FieldKind::StringList { min_items: None }),
    field("technology_trends", FieldKind::StringList { min_items: None }),
    field("main_bottlenecks", FieldKind::StringList { min_items: None }),
    field("budget_insights", FieldKind::Text { bounds: None }),
    field("security_concerns", FieldKind::StringList { min_items: None }),
    field(
        "deployment_preferences",
        FieldKind::StringList { min_items: None },
    ),
    field("key_insights", FieldKind::Text { bounds: Some((50, 500)) }),
    field(
        "recommendations",
        FieldKind::Text { bounds: Some((50, 500)) },
    ),
];

static TEMPLATE: Lazy<Value> = Lazy::new(|| {
    json!({
        "total_participants": 0,
        "completed_surveys": 0,
        "in_progress_surveys": 0,
        "completion_rate_percentage": 0.0,
        "positive_indicators": 0,
        "negative_indicators": 0,
        "top_keywords": ["keyword1", "keyword2", "keyword3"],
        "key_pain_points": ["pain point 1", "pain point 2", "pain point 3"],
        "common_workflows": ["workflow1", "workflow2"],
        "technology_trends": ["trend1", "trend2"],
        "main_bottlenecks": ["bottleneck1", "bottleneck2"],
        "budget_insights": "Summary of budget discussions...",
        "security_concerns": ["concern1", "concern2"],
        "deployment_preferences": ["preference1", "preference2"],
        "key_insights": "2-3 sentence summary of the most important findings...",
        "recommendations": "2-3 sentence actionable recommendations based on the data..."
    })
});

/// Template object showing the AI the expected response structure.
pub fn schema_template() -> &'static Value {
    &TEMPLATE
}
