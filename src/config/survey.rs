//! Survey catalog configuration

use serde::Deserialize;

use crate::domain::catalog::{CompletionRule, SchemaCatalog};

use super::error::ValidationError;

/// Survey progression configuration.
///
/// The topic list itself is fixed; only how completion is derived from
/// it varies between deployments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyConfig {
    /// Completed-schema count that marks a respondent as done.
    /// Defaults to the catalog size.
    pub completion_target: Option<usize>,

    /// How a respondent's coarse status is derived
    #[serde(default)]
    pub completion_rule: CompletionRule,
}

impl SurveyConfig {
    /// Builds the schema catalog this deployment runs with.
    pub fn catalog(&self) -> SchemaCatalog {
        let mut catalog = SchemaCatalog::standard().with_completion_rule(self.completion_rule);
        if let Some(target) = self.completion_target {
            catalog = catalog.with_completion_target(target);
        }
        catalog
    }

    /// Validate survey configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.completion_target == Some(0) {
            return Err(ValidationError::InvalidCompletionTarget);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_matches_standard() {
        let config = SurveyConfig::default();
        let catalog = config.catalog();

        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.completion_target(), 6);
        assert_eq!(catalog.completion_rule(), CompletionRule::SchemaCount);
    }

    #[test]
    fn test_configured_target_and_rule() {
        let config = SurveyConfig {
            completion_target: Some(4),
            completion_rule: CompletionRule::TerminalSignal,
        };
        let catalog = config.catalog();

        assert_eq!(catalog.completion_target(), 4);
        assert_eq!(catalog.completion_rule(), CompletionRule::TerminalSignal);
    }

    #[test]
    fn test_validation_rejects_zero_target() {
        let config = SurveyConfig {
            completion_target: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
