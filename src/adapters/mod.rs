//! Adapters - Implementations of the ports.
//!
//! - `ai` - HTTP clients for the conversational survey agent and the
//!   analysis model, plus a scriptable mock for tests
//! - `store` - In-memory conversation store

pub mod ai;
pub mod store;
