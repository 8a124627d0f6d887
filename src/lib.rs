//! Survey Sherpa - AI-Guided Conversational Survey Core
//!
//! This crate implements the core of a conversational survey platform:
//! an external AI service chats with each respondent and incrementally
//! fills a fixed catalog of business-intelligence schemas, and an
//! aggregation path asks the same service for an analytical summary
//! which is sanitized into a strict, type-stable shape.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
