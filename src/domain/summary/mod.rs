//! Summary schema definition and response validation.
//!
//! # Module Organization
//!
//! - `schema` - The closed descriptor set for the 16-field summary contract
//! - `record` - The strictly-typed `SummaryRecord` and its fallback
//! - `validator` - Structural coercion of untrusted AI output

mod record;
mod schema;
mod validator;

pub use record::SummaryRecord;
pub use schema::{schema_template, FieldKind, FieldSpec, SUMMARY_FIELDS};
pub use validator::{SummaryValidator, ValidationOutcome};
