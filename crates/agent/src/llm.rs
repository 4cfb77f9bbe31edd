use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use askledger_core::prompt::{ModelResponse, Prompt};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LlmError {
    /// The backend answered with a non-success status. Status and body are
    /// kept for diagnostics; the body is logged, never the credential.
    #[error("generation backend error ({status})")]
    Transport { status: u16, body: String },
    /// The request never produced a status (connection refused, timeout).
    #[error("generation backend unreachable: {detail}")]
    Request { detail: String },
    /// The body was not parseable as the expected envelope.
    #[error("could not parse generation backend response")]
    Malformed { detail: String },
    /// The envelope parsed but carried no candidate content, typically
    /// safety filtering or quota exhaustion.
    #[error("generation backend returned an empty result")]
    EmptyResult,
}

/// Seam for the text-generation backend. The credential is supplied per
/// call so the orchestrator owns its presence check.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &Prompt,
        credential: &SecretString,
    ) -> Result<ModelResponse, LlmError>;
}
