//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod generation;
pub mod orchestrator;
pub mod prompt_builder;
pub mod retrieval;
pub mod session;
