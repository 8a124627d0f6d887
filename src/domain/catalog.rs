//! Schema Catalog - the ordered set of intelligence topics a survey
//! conversation elicits.
//!
//! The catalog is immutable for the process lifetime. It is built once at
//! startup (from defaults or configuration) and passed by reference to the
//! components that need it; there is no global mutable state.

use serde::{Deserialize, Serialize};

/// One topic of structured data the AI conversation aims to elicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Identifier used by the AI service in completed-schema payloads.
    pub id: String,
    /// Ordinal position within the catalog.
    pub position: usize,
    /// Human-readable label for reporting.
    pub label: String,
}

/// How a respondent's coarse status is derived.
///
/// Surrounding systems disagree on whether completion is a raw count of
/// completed schemas or an explicit terminal signal from the AI service,
/// so the rule is an explicit input rather than a hard-coded policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRule {
    /// Completed once the completed-schema count reaches the target.
    SchemaCount,
    /// Completed only when the AI service emits its terminal signal.
    TerminalSignal,
}

impl Default for CompletionRule {
    fn default() -> Self {
        CompletionRule::SchemaCount
    }
}

/// Immutable, ordered catalog of schema definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    definitions: Vec<SchemaDefinition>,
    completion_rule: CompletionRule,
    /// Completed-schema count at which a respondent counts as done.
    /// Defaults to the catalog size; configurable because deployed
    /// catalogs have varied in size.
    completion_target: usize,
}

impl SchemaCatalog {
    /// Builds a catalog from an ordered list of (id, label) pairs.
    pub fn new(topics: impl IntoIterator<Item = (String, String)>) -> Self {
        let definitions: Vec<SchemaDefinition> = topics
            .into_iter()
            .enumerate()
            .map(|(position, (id, label))| SchemaDefinition {
                id,
                position,
                label,
            })
            .collect();
        let completion_target = definitions.len();

        Self {
            definitions,
            completion_rule: CompletionRule::default(),
            completion_target,
        }
    }

    /// The six intelligence topics of the standard survey.
    pub fn standard() -> Self {
        Self::new(
            [
                ("workflows", "Workflows and processes"),
                ("pain_points", "Pain points"),
                ("technology", "Technology landscape"),
                ("budget", "Budget"),
                ("security", "Security and compliance"),
                ("deployment", "Deployment preferences"),
            ]
            .map(|(id, label)| (id.to_string(), label.to_string())),
        )
    }

    /// Overrides the completion rule.
    pub fn with_completion_rule(mut self, rule: CompletionRule) -> Self {
        self.completion_rule = rule;
        self
    }

    /// Overrides the completion target.
    ///
    /// Targets above the catalog size are allowed; they simply make the
    /// count rule unreachable without a larger catalog.
    pub fn with_completion_target(mut self, target: usize) -> Self {
        self.completion_target = target;
        self
    }

    /// Number of schema definitions in the catalog.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True if the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The definitions in catalog order.
    pub fn definitions(&self) -> &[SchemaDefinition] {
        &self.definitions
    }

    /// Looks up a definition by its identifier.
    pub fn find(&self, id: &str) -> Option<&SchemaDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// True if the identifier names a catalog topic.
    pub fn recognizes(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// The configured completion rule.
    pub fn completion_rule(&self) -> CompletionRule {
        self.completion_rule
    }

    /// The completed-schema count that marks a respondent as done.
    pub fn completion_target(&self) -> usize {
        self.completion_target
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
