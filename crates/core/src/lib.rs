//! Core domain types for the askledger assistant.
//!
//! Everything in this crate is pure: value types for prompts and answers,
//! the output sanitizer, the saved-search specification, and the trait
//! seams the datastore crate implements. No I/O happens here.

pub mod config;
pub mod datastore;
pub mod envelope;
pub mod prompt;
pub mod sanitize;
pub mod search;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use datastore::{DatastoreError, QueryEngine, Row, SavedSearchStore, MAX_RESULT_ROWS};
pub use envelope::AnswerEnvelope;
pub use prompt::{ModelResponse, Prompt, Turn, TurnRole};
pub use sanitize::{sanitize, SanitizeKind};
pub use search::{SavedSearchRef, SavedSearchSpec, SpecParseError, TITLE_PREFIX};
