//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `catalog` - The immutable schema catalog and completion rule
//! - `conversation` - Per-respondent conversation progress tracking
//! - `summary` - Summary schema definition and response validation

pub mod catalog;
pub mod conversation;
pub mod foundation;
pub mod summary;
