//! Conversation State Entity
//!
//! Tracks a single respondent's progress through the survey
//! conversation, independent of the AI service driving it.
//!
//! The surrounding system stores this state as a loosely-typed JSON blob
//! on the respondent row; the serde shape below (`block_id`/`data`) is
//! that external representation, so conversion happens entirely at the
//! store boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{AiSessionId, Timestamp};

/// The AI service's per-turn indicator of elicitation progress.
///
/// Wire values: `0` continue, `1` schema topic completed, `-1` whole
/// survey completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSignal {
    /// The current topic still needs more conversation.
    Continue,
    /// The current schema topic has been fully elicited.
    SchemaCompleted,
    /// The AI has elicited every topic and closed the survey.
    SurveyCompleted,
}

impl CompletionSignal {
    /// Maps the AI service's numeric status to a signal.
    ///
    /// Returns `None` for statuses outside the wire contract; callers
    /// treat those as a malformed reply.
    pub fn from_status(status: i64) -> Option<Self> {
        match status {
            0 => Some(CompletionSignal::Continue),
            1 => Some(CompletionSignal::SchemaCompleted),
            -1 => Some(CompletionSignal::SurveyCompleted),
            _ => None,
        }
    }

    /// True if this signal completes the current schema topic.
    pub fn completes_schema(&self) -> bool {
        matches!(self, CompletionSignal::SchemaCompleted)
    }
}

/// Raw schema payload attached to a completion signal.
///
/// The AI service emits `{"block_id": ..., "data": {...}}`, sometimes as
/// a JSON string rather than an object. The payload is preserved verbatim
/// even when it does not match that shape; recognizing the identifier is
/// advisory, not a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPayload {
    /// Schema identifier claimed by the AI service. Empty if absent.
    pub schema_id: String,
    /// Field values elicited for the topic.
    pub fields: Map<String, Value>,
}

impl SchemaPayload {
    /// Builds a payload from an arbitrary decoded value.
    ///
    /// Strings are first re-parsed as JSON, since the AI service
    /// sometimes double-encodes the payload.
    pub fn from_value(raw: Value) -> Self {
        let value = match raw {
            Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
            other => other,
        };

        match value {
            Value::Object(map) => {
                let schema_id = match map.get("block_id") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                let fields = match map.get("data") {
                    Some(Value::Object(data)) => data.clone(),
                    Some(other) => {
                        let mut wrapped = Map::new();
                        wrapped.insert("value".to_string(), other.clone());
                        wrapped
                    }
                    None => map,
                };
                Self { schema_id, fields }
            }
            other => {
                let mut wrapped = Map::new();
                wrapped.insert("value".to_string(), other);
                Self {
                    schema_id: String::new(),
                    fields: wrapped,
                }
            }
        }
    }
}

/// One completed schema topic for a respondent.
///
/// Created exactly once when the completion signal is observed and never
/// mutated afterwards. The serde field names match the external blob
/// shape stored on the respondent row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSchema {
    #[serde(rename = "block_id")]
    pub schema_id: String,
    #[serde(rename = "data")]
    pub fields: Map<String, Value>,
    pub completed_at: Timestamp,
}

impl CompletedSchema {
    /// Builds a completed schema from the AI payload.
    pub fn from_payload(payload: SchemaPayload) -> Self {
        Self {
            schema_id: payload.schema_id,
            fields: payload.fields,
            completed_at: Timestamp::now(),
        }
    }
}

/// Respondent-level coarse completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    InProgress,
    Completed,
}

/// Complete conversation progress for one respondent.
///
/// Owned exclusively by the respondent record; concurrent turns for the
/// same respondent must be serialized by the store (per-row lock or
/// version check) — this entity assumes at most one in-flight turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Session token issued by the AI service at registration.
    pub session: AiSessionId,
    /// Completed schemas in arrival order, which is the order topics
    /// were actually completed, not catalog order.
    completed: Vec<CompletedSchema>,
    status: SurveyStatus,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationState {
    /// Creates a fresh in-progress state for a new session.
    pub fn new(session: AiSessionId) -> Self {
        let now = Timestamp::now();
        Self {
            session,
            completed: Vec::new(),
            status: SurveyStatus::InProgress,
            started_at: now,
            updated_at: now,
        }
    }

    /// Completed schemas in arrival order.
    pub fn completed_schemas(&self) -> &[CompletedSchema] {
        &self.completed
    }

    /// Count of completed schemas.
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Current coarse status.
    pub fn status(&self) -> SurveyStatus {
        self.status
    }

    /// True while the respondent can still submit turns.
    pub fn is_in_progress(&self) -> bool {
        self.status == SurveyStatus::InProgress
    }

    pub(super) fn append_completed(&mut self, schema: CompletedSchema) {
        self.completed.push(schema);
        self.updated_at = Timestamp::now();
    }

    pub(super) fn set_status(&mut self, status: SurveyStatus) {
        if self.status != status {
            self.status = status;
            self.updated_at = Timestamp::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signal_from_status_covers_wire_contract() {
        assert_eq!(
            CompletionSignal::from_status(0),
            Some(CompletionSignal::Continue)
        );
        assert_eq!(
            CompletionSignal::from_status(1),
            Some(CompletionSignal::SchemaCompleted)
        );
        assert_eq!(
            CompletionSignal::from_status(-1),
            Some(CompletionSignal::SurveyCompleted)
        );
        assert_eq!(CompletionSignal::from_status(7), None);
    }

    #[test]
    fn payload_from_well_formed_object() {
        let payload = SchemaPayload::from_value(json!({
            "block_id": "budget",
            "data": {"annual": "50k", "owner": "IT"}
        }));

        assert_eq!(payload.schema_id, "budget");
        assert_eq!(payload.fields.get("annual").unwrap(), "50k");
    }

    #[test]
    fn payload_from_double_encoded_string() {
        let raw = json!("{\"block_id\": \"workflows\", \"data\": {\"primary\": \"ETL\"}}");
        let payload = SchemaPayload::from_value(raw);

        assert_eq!(payload.schema_id, "workflows");
        assert_eq!(payload.fields.get("primary").unwrap(), "ETL");
    }

    #[test]
    fn payload_without_block_id_keeps_fields_verbatim() {
        let payload = SchemaPayload::from_value(json!({"notes": "freeform"}));

        assert_eq!(payload.schema_id, "");
        assert_eq!(payload.fields.get("notes").unwrap(), "freeform");
    }

    #[test]
    fn payload_from_scalar_wraps_value() {
        let payload = SchemaPayload::from_value(json!(42));

        assert_eq!(payload.schema_id, "");
        assert_eq!(payload.fields.get("value").unwrap(), 42);
    }

    #[test]
    fn new_state_is_empty_and_in_progress() {
        let state = ConversationState::new(AiSessionId::new("sess-1"));

        assert!(state.is_in_progress());
        assert_eq!(state.completed_count(), 0);
        assert_eq!(state.status(), SurveyStatus::InProgress);
    }

    #[test]
    fn completed_schema_serializes_to_external_blob_shape() {
        let schema = CompletedSchema::from_payload(SchemaPayload::from_value(json!({
            "block_id": "security",
            "data": {"compliance": "SOC2"}
        })));

        let blob = serde_json::to_value(&schema).unwrap();
        assert_eq!(blob["block_id"], "security");
        assert_eq!(blob["data"]["compliance"], "SOC2");
        assert!(blob.get("completed_at").is_some());
    }

    #[test]
    fn state_round_trips_through_external_json() {
        let mut state = ConversationState::new(AiSessionId::new("sess-2"));
        state.append_completed(CompletedSchema::from_payload(SchemaPayload::from_value(
            json!({"block_id": "budget", "data": {"annual": "50k"}}),
        )));

        let blob = serde_json::to_value(&state).unwrap();
        let restored: ConversationState = serde_json::from_value(blob).unwrap();

        assert_eq!(restored, state);
    }
}
