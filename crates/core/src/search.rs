use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Titles of machine-generated searches carry this marker so they are
/// recognizable next to hand-made ones.
pub const TITLE_PREFIX: &str = "AI Generated: ";

/// Longest excerpt of unparseable model output embedded in an error.
/// Bounds the error payload no matter how much text the model produced.
const EXCERPT_LIMIT: usize = 50;

/// A structured saved-search definition produced by the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedSearchSpec {
    /// Record type the search runs over, e.g. `transactions`.
    pub target: String,
    pub filters: Vec<serde_json::Value>,
    pub columns: Vec<String>,
    pub title: String,
}

/// Reference to a persisted saved search. `location` is host-relative so
/// links keep working regardless of the deployment domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearchRef {
    pub id: String,
    pub location: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpecParseError {
    #[error("model returned invalid JSON. Raw response: {excerpt}...")]
    InvalidJson { excerpt: String },
    #[error("saved search definition is incomplete: {0}")]
    Invalid(String),
}

impl SavedSearchSpec {
    /// Parses sanitized model output into a spec and validates its shape.
    ///
    /// On parse failure the error embeds at most [`EXCERPT_LIMIT`]
    /// characters of the raw text.
    pub fn parse(sanitized: &str) -> Result<Self, SpecParseError> {
        let spec: Self = serde_json::from_str(sanitized)
            .map_err(|_| SpecParseError::InvalidJson { excerpt: excerpt(sanitized) })?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), SpecParseError> {
        if self.target.trim().is_empty() {
            return Err(SpecParseError::Invalid("missing search target type".to_string()));
        }
        if self.columns.is_empty() {
            return Err(SpecParseError::Invalid("at least one column is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(SpecParseError::Invalid("missing title".to_string()));
        }
        if !self.title.starts_with(TITLE_PREFIX) {
            return Err(SpecParseError::Invalid(format!(
                "title must start with `{TITLE_PREFIX}`"
            )));
        }
        Ok(())
    }
}

fn excerpt(raw: &str) -> String {
    raw.chars().take(EXCERPT_LIMIT).collect()
}
