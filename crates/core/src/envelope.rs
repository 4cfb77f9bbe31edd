use serde::{Deserialize, Serialize};

/// The single response shape every pipeline invocation produces.
///
/// Exactly one of `answer` or `error` is populated, never both and never
/// neither; the constructors are the only way to build one. `sql_used`
/// carries the executed query text when the query flow ran, so callers can
/// surface machine-generated SQL for debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnswerEnvelope {
    pub fn success(answer: impl Into<String>, sql_used: Option<String>) -> Self {
        Self { answer: Some(answer.into()), sql_used, error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { answer: None, sql_used: None, error: Some(error.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.answer.is_some()
    }
}
