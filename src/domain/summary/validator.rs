//! Response Validator/Sanitizer
//!
//! Turns an arbitrary decoded JSON value from the AI service into a
//! summary that satisfies the contract exactly. Malformed input is never
//! an error here: every structural problem is repaired by substitution
//! and reported as a deviation. The component knows nothing about
//! business meaning; it is purely structural coercion.

use serde_json::Value;

use super::record::{round2, SummaryRecord};
use super::schema::{FieldKind, FieldSpec, SUMMARY_FIELDS};

/// Outcome of validating one AI response.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Structurally complete summary, always safe to return to callers.
    pub summary: SummaryRecord,
    /// True iff the source matched the contract without any correction.
    pub conformant: bool,
    /// Human-readable record of every correction made, in field order.
    pub deviations: Vec<String>,
}

/// Single-pass validator over the summary field descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryValidator;

/// A field value after coercion, ready for assignment.
enum Coerced {
    Count(u64),
    Percent(f64),
    List(Vec<String>),
    Text(String),
}

impl SummaryValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates and sanitizes a raw AI response.
    ///
    /// Accepts anything `serde_json` can decode, including `null`, bare
    /// strings (the caller's stand-in when JSON parsing itself failed),
    /// numbers, and deeply malformed structures. Never fails.
    pub fn validate(&self, raw: &Value) -> ValidationOutcome {
        let mut deviations = Vec::new();

        let source = match raw.as_object() {
            Some(map) => Some(map),
            None => {
                deviations.push("AI response is not a JSON object".to_string());
                None
            }
        };

        let mut summary = SummaryRecord::default();
        for spec in &SUMMARY_FIELDS {
            let value = source.and_then(|map| map.get(spec.name));
            let coerced = coerce_field(spec, value, &mut deviations);
            assign(&mut summary, spec.name, coerced);
        }

        ValidationOutcome {
            conformant: deviations.is_empty(),
            summary,
            deviations,
        }
    }
}

fn coerce_field(spec: &FieldSpec, value: Option<&Value>, deviations: &mut Vec<String>) -> Coerced {
    let value = match value {
        Some(v) => v,
        None => {
            deviations.push(format!("Missing required field: {}", spec.name));
            return zero_value(spec.kind);
        }
    };

    match spec.kind {
        FieldKind::Count => Coerced::Count(coerce_count(spec.name, value, deviations)),
        FieldKind::Percentage => Coerced::Percent(coerce_percentage(spec.name, value, deviations)),
        FieldKind::StringList { min_items } => {
            Coerced::List(coerce_list(spec.name, value, min_items, deviations))
        }
        FieldKind::Text { bounds } => Coerced::Text(coerce_text(spec.name, value, bounds, deviations)),
    }
}

fn zero_value(kind: FieldKind) -> Coerced {
    match kind {
        FieldKind::Count => Coerced::Count(0),
        FieldKind::Percentage => Coerced::Percent(0.0),
        FieldKind::StringList { .. } => Coerced::List(Vec::new()),
        FieldKind::Text { .. } => Coerced::Text(String::new()),
    }
}

fn coerce_count(name: &str, value: &Value, deviations: &mut Vec<String>) -> u64 {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| u.min(i64::MAX as u64) as i64))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };

    match parsed {
        Some(n) if n < 0 => {
            deviations.push(format!("{} must be non-negative", name));
            0
        }
        Some(n) => n as u64,
        None => {
            deviations.push(format!("{} must be an integer", name));
            0
        }
    }
}

fn coerce_percentage(name: &str, value: &Value, deviations: &mut Vec<String>) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite());

    match parsed {
        Some(rate) if (0.0..=100.0).contains(&rate) => round2(rate),
        Some(rate) => {
            deviations.push(format!("{} must be between 0 and 100", name));
            round2(rate.clamp(0.0, 100.0))
        }
        None => {
            deviations.push(format!("{} must be a number", name));
            0.0
        }
    }
}

fn coerce_list(
    name: &str,
    value: &Value,
    min_items: Option<usize>,
    deviations: &mut Vec<String>,
) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(coerce_list_item).collect(),
        Value::Null => {
            deviations.push(format!("{} must be an array", name));
            Vec::new()
        }
        // A lone scalar becomes a one-element list rather than being
        // discarded; the AI frequently drops the brackets.
        other => {
            deviations.push(format!("{} must be an array", name));
            coerce_list_item(other).into_iter().collect()
        }
    };

    if let Some(min) = min_items {
        if items.len() < min {
            deviations.push(format!("{} should have at least {} items", name, min));
        }
    }

    items
}

fn coerce_list_item(item: &Value) -> Option<String> {
    let text = match item {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn coerce_text(
    name: &str,
    value: &Value,
    bounds: Option<(usize, usize)>,
    deviations: &mut Vec<String>,
) -> String {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => {
            deviations.push(format!("{} must be a string", name));
            String::new()
        }
        other => {
            deviations.push(format!("{} must be a string", name));
            other.to_string().trim().to_string()
        }
    };

    // Out-of-range text is kept verbatim: truncation would silently lose
    // information and padding would fabricate content.
    if let Some((min, max)) = bounds {
        let len = text.chars().count();
        if len < min {
            deviations.push(format!("{} should be at least {} characters", name, min));
        } else if len > max {
            deviations.push(format!("{} should be at most {} characters", name, max));
        }
    }

    text
}

fn assign(summary: &mut SummaryRecord, name: &str, coerced: Coerced) {
    match (name, coerced) {
        ("total_participants", Coerced::Count(n)) => summary.total_participants = n,
        ("completed_surveys", Coerced::Count(n)) => summary.completed_surveys = n,
        ("in_progress_surveys", Coerced::Count(n)) => summary.in_progress_surveys = n,
        ("completion_rate_percentage", Coerced::Percent(f)) => {
            summary.completion_rate_percentage = f
        }
        ("positive_indicators", Coerced::Count(n)) => summary.positive_indicators = n,
        ("negative_indicators", Coerced::Count(n)) => summary.negative_indicators = n,
        ("top_keywords", Coerced::List(v)) => summary.top_keywords = v,
        ("key_pain_points", Coerced::List(v)) => summary.key_pain_points = v,
        ("common_workflows", Coerced::List(v)) => summary.common_workflows = v,
        ("technology_trends", Coerced::List(v)) => summary.technology_trends = v,
        ("main_bottlenecks", Coerced::List(v)) => summary.main_bottlenecks = v,
        ("budget_insights", Coerced::Text(s)) => summary.budget_insights = s,
        ("security_concerns", Coerced::List(v)) => summary.security_concerns = v,
        ("deployment_preferences", Coerced::List(v)) => summary.deployment_preferences = v,
        ("key_insights", Coerced::Text(s)) => summary.key_insights = s,
        ("recommendations", Coerced::Text(s)) => summary.recommendations = s,
        // Descriptor names and assignment arms are maintained together;
        // a mismatch leaves the default zero-value in place.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::schema::schema_template;
    use proptest::prelude::*;
    use serde_json::json;

    fn validate(raw: Value) -> ValidationOutcome {
        SummaryValidator::new().validate(&raw)
    }

    fn long_text(len: usize) -> String {
        "x".repeat(len)
    }

    /// A source object that conforms to the contract without correction.
    fn conformant_source() -> Value {
        json!({
            "total_participants": 10,
            "completed_surveys": 6,
            "in_progress_surveys": 4,
            "completion_rate_percentage": 60.0,
            "positive_indicators": 12,
            "negative_indicators": 3,
            "top_keywords": ["automation", "integration", "cost"],
            "key_pain_points": ["manual data entry", "slow reporting"],
            "common_workflows": ["ETL"],
            "technology_trends": ["LLM adoption"],
            "main_bottlenecks": ["approvals"],
            "budget_insights": "Budgets are flat year over year.",
            "security_concerns": ["SOC2"],
            "deployment_preferences": ["cloud"],
            "key_insights": long_text(80),
            "recommendations": long_text(80),
        })
    }

    mod structural_tolerance {
        use super::*;

        #[test]
        fn null_input_yields_complete_summary() {
            let outcome = validate(json!(null));

            assert!(!outcome.conformant);
            assert_eq!(outcome.summary.total_participants, 0);
            assert_eq!(outcome.summary.completion_rate_percentage, 0.0);
            assert!(outcome.summary.top_keywords.is_empty());
            assert_eq!(outcome.summary.key_insights, "");
        }

        #[test]
        fn bare_string_input_reports_not_an_object() {
            let outcome = validate(json!("the model replied with prose"));

            assert!(!outcome.conformant);
            assert_eq!(outcome.deviations[0], "AI response is not a JSON object");
            // One missing-field deviation per contract field follows.
            assert_eq!(outcome.deviations.len(), 1 + SUMMARY_FIELDS.len());
        }

        #[test]
        fn number_and_array_inputs_do_not_panic() {
            validate(json!(42));
            validate(json!([{"nested": [1, 2, {"deep": null}]}]));
        }

        #[test]
        fn every_missing_field_gets_a_deviation() {
            let outcome = validate(json!({}));

            for spec in &SUMMARY_FIELDS {
                let expected = format!("Missing required field: {}", spec.name);
                assert!(
                    outcome.deviations.contains(&expected),
                    "no deviation for {}",
                    spec.name
                );
            }
        }
    }

    mod integer_coercion {
        use super::*;

        #[test]
        fn numeric_string_is_coerced() {
            let outcome = validate(json!({"total_participants": "10"}));
            assert_eq!(outcome.summary.total_participants, 10);
            assert!(!outcome
                .deviations
                .iter()
                .any(|d| d.contains("total_participants")));
        }

        #[test]
        fn float_is_truncated() {
            let outcome = validate(json!({"positive_indicators": 3.9}));
            assert_eq!(outcome.summary.positive_indicators, 3);
        }

        #[test]
        fn negative_is_clamped_with_deviation() {
            let outcome = validate(json!({"completed_surveys": -4}));
            assert_eq!(outcome.summary.completed_surveys, 0);
            assert!(outcome
                .deviations
                .contains(&"completed_surveys must be non-negative".to_string()));
        }

        #[test]
        fn non_numeric_substitutes_zero_with_deviation() {
            let outcome = validate(json!({"negative_indicators": {"oops": true}}));
            assert_eq!(outcome.summary.negative_indicators, 0);
            assert!(outcome
                .deviations
                .contains(&"negative_indicators must be an integer".to_string()));
        }
    }

    mod percentage_coercion {
        use super::*;

        #[test]
        fn out_of_range_is_clamped_with_deviation() {
            let outcome = validate(json!({"completion_rate_percentage": 150}));

            assert_eq!(outcome.summary.completion_rate_percentage, 100.0);
            assert!(outcome
                .deviations
                .contains(&"completion_rate_percentage must be between 0 and 100".to_string()));
        }

        #[test]
        fn negative_rate_clamps_to_zero() {
            let outcome = validate(json!({"completion_rate_percentage": -3.5}));
            assert_eq!(outcome.summary.completion_rate_percentage, 0.0);
        }

        #[test]
        fn numeric_string_is_rounded_to_two_places() {
            let outcome = validate(json!({"completion_rate_percentage": "66.666"}));
            assert_eq!(outcome.summary.completion_rate_percentage, 66.67);
        }

        #[test]
        fn non_numeric_substitutes_zero() {
            let outcome = validate(json!({"completion_rate_percentage": "most of them"}));
            assert_eq!(outcome.summary.completion_rate_percentage, 0.0);
            assert!(outcome
                .deviations
                .contains(&"completion_rate_percentage must be a number".to_string()));
        }
    }

    mod list_coercion {
        use super::*;

        #[test]
        fn lone_string_is_wrapped_with_deviation() {
            let outcome = validate(json!({"top_keywords": "automation"}));

            assert_eq!(outcome.summary.top_keywords, vec!["automation"]);
            assert!(outcome
                .deviations
                .contains(&"top_keywords must be an array".to_string()));
        }

        #[test]
        fn null_becomes_empty_list() {
            let outcome = validate(json!({"security_concerns": null}));
            assert!(outcome.summary.security_concerns.is_empty());
        }

        #[test]
        fn elements_are_stringified_and_blanks_dropped() {
            let outcome = validate(json!({
                "common_workflows": ["ETL", "", "   ", null, 7, {"k": "v"}]
            }));

            assert_eq!(
                outcome.summary.common_workflows,
                vec!["ETL", "7", "{\"k\":\"v\"}"]
            );
        }

        #[test]
        fn short_keyword_list_is_kept_with_deviation() {
            let outcome = validate(json!({"top_keywords": ["only", "two"]}));

            assert_eq!(outcome.summary.top_keywords, vec!["only", "two"]);
            assert!(outcome
                .deviations
                .contains(&"top_keywords should have at least 3 items".to_string()));
        }

        #[test]
        fn short_pain_point_list_is_flagged() {
            let outcome = validate(json!({"key_pain_points": ["just one"]}));

            assert_eq!(outcome.summary.key_pain_points, vec!["just one"]);
            assert!(outcome
                .deviations
                .contains(&"key_pain_points should have at least 2 items".to_string()));
        }
    }

    mod text_coercion {
        use super::*;

        #[test]
        fn text_is_trimmed() {
            let outcome = validate(json!({"budget_insights": "  flat budgets  "}));
            assert_eq!(outcome.summary.budget_insights, "flat budgets");
        }

        #[test]
        fn short_insights_kept_verbatim_with_deviation() {
            let outcome = validate(json!({"key_insights": "too short"}));

            assert_eq!(outcome.summary.key_insights, "too short");
            assert!(outcome
                .deviations
                .contains(&"key_insights should be at least 50 characters".to_string()));
            assert!(!outcome.conformant);
        }

        #[test]
        fn overlong_recommendations_flagged_not_truncated() {
            let text = long_text(600);
            let outcome = validate(json!({"recommendations": text}));

            assert_eq!(outcome.summary.recommendations.chars().count(), 600);
            assert!(outcome
                .deviations
                .contains(&"recommendations should be at most 500 characters".to_string()));
        }

        #[test]
        fn non_string_is_stringified_with_deviation() {
            let outcome = validate(json!({"budget_insights": 12000}));

            assert_eq!(outcome.summary.budget_insights, "12000");
            assert!(outcome
                .deviations
                .contains(&"budget_insights must be a string".to_string()));
        }
    }

    mod conformance {
        use super::*;

        #[test]
        fn conformant_source_has_no_deviations() {
            let outcome = validate(conformant_source());

            assert!(outcome.conformant, "deviations: {:?}", outcome.deviations);
            assert_eq!(outcome.summary.total_participants, 10);
            assert_eq!(outcome.summary.completion_rate_percentage, 60.0);
        }

        #[test]
        fn schema_template_itself_conforms() {
            let outcome = validate(schema_template().clone());
            assert!(outcome.conformant, "deviations: {:?}", outcome.deviations);
        }

        #[test]
        fn partial_response_scenario() {
            // Missing most fields, numeric string, bare keyword string.
            let outcome = validate(json!({
                "total_participants": "10",
                "top_keywords": "automation"
            }));

            assert_eq!(outcome.summary.total_participants, 10);
            assert_eq!(outcome.summary.top_keywords, vec!["automation"]);
            assert_eq!(outcome.summary.completion_rate_percentage, 0.0);
            assert!(!outcome.conformant);
            assert!(!outcome.deviations.is_empty());
        }

        #[test]
        fn revalidating_conformant_output_is_a_no_op() {
            let first = validate(conformant_source());
            assert!(first.conformant);

            let reencoded = serde_json::to_value(&first.summary).unwrap();
            let second = validate(reencoded);

            assert!(second.conformant);
            assert_eq!(second.summary, first.summary);
        }
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            any::<f64>().prop_map(|f| serde_json::to_value(f).unwrap_or(Value::Null)),
            "[ -~]{0,32}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{0,24}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// The validator never fails, whatever the AI sends back.
        #[test]
        fn validate_never_panics(raw in arb_json()) {
            let outcome = validate(raw);
            prop_assert_eq!(outcome.conformant, outcome.deviations.is_empty());
        }

        /// A sanitized summary re-validates to the identical record.
        #[test]
        fn sanitized_output_is_stable(raw in arb_json()) {
            let first = validate(raw);
            let reencoded = serde_json::to_value(&first.summary).unwrap();
            let second = validate(reencoded);
            prop_assert_eq!(second.summary, first.summary);
        }
    }
}
