use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use askledger_core::datastore::{QueryEngine, Row, SavedSearchStore, MAX_RESULT_ROWS};
use askledger_core::envelope::AnswerEnvelope;
use askledger_core::prompt::{Prompt, Turn};
use askledger_core::sanitize::{sanitize, SanitizeKind};
use askledger_core::search::{SavedSearchSpec, SpecParseError};

use crate::llm::{LlmClient, LlmError};
use crate::{prompts, synthesize};

/// The two pipeline configurations. They share the whole orchestration
/// skeleton and differ only in system prompt, sanitizer kind, and which
/// executor the payload is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Translate to SQL, execute, summarize the rows.
    Query,
    /// Translate to a saved-search spec, persist it, link back.
    SavedSearch,
}

impl Flow {
    fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::SavedSearch => "saved_search",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing API key. Configure llm.api_key before using the assistant.")]
    MissingCredential,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    SpecParse(#[from] SpecParseError),
    /// Embeds the exact attempted SQL: the query was machine-generated and
    /// would otherwise be opaque to the person debugging it.
    #[error("query failed. Model suggested: {sql} | Details: {detail}")]
    QueryExecution { sql: String, detail: String },
    #[error("datastore rejected the search definition: {detail}")]
    ActionCreation { detail: String },
    #[error("could not summarize results: {0}")]
    Synthesis(#[source] LlmError),
}

impl PipelineError {
    fn stage(&self) -> &'static str {
        match self {
            Self::MissingCredential => "start",
            Self::Llm(_) => "generate_payload",
            Self::SpecParse(_) => "sanitize",
            Self::QueryExecution { .. } | Self::ActionCreation { .. } => "execute",
            Self::Synthesis(_) => "synthesize",
        }
    }
}

struct PipelineOutcome {
    answer: String,
    sql_used: Option<String>,
}

/// Sequences one request through generate → sanitize → execute →
/// synthesize and maps every failure to a single answer envelope. Holds no
/// per-request state; conversation history is re-supplied by the caller.
pub struct Pipeline {
    llm: Arc<dyn LlmClient>,
    engine: Arc<dyn QueryEngine>,
    store: Arc<dyn SavedSearchStore>,
    credential: Option<SecretString>,
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        engine: Arc<dyn QueryEngine>,
        store: Arc<dyn SavedSearchStore>,
        credential: Option<SecretString>,
    ) -> Self {
        Self { llm, engine, store, credential }
    }

    /// Runs the full pipeline and always returns an envelope: `answer` on
    /// success, `error` on any failure, never both. Full failure detail is
    /// logged server-side; the envelope carries the human-readable message.
    pub async fn run(&self, flow: Flow, user_text: &str, prior_turns: Vec<Turn>) -> AnswerEnvelope {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "pipeline.request.start",
            correlation_id = %correlation_id,
            flow = flow.as_str(),
            "pipeline request accepted"
        );

        match self.execute(flow, user_text, prior_turns).await {
            Ok(outcome) => {
                info!(
                    event_name = "pipeline.request.completed",
                    correlation_id = %correlation_id,
                    flow = flow.as_str(),
                    "pipeline request completed"
                );
                AnswerEnvelope::success(outcome.answer, outcome.sql_used)
            }
            Err(failure) => {
                error!(
                    event_name = "pipeline.request.failed",
                    correlation_id = %correlation_id,
                    flow = flow.as_str(),
                    stage = failure.stage(),
                    error = %failure,
                    "pipeline request failed"
                );
                AnswerEnvelope::failure(failure.to_string())
            }
        }
    }

    async fn execute(
        &self,
        flow: Flow,
        user_text: &str,
        prior_turns: Vec<Turn>,
    ) -> Result<PipelineOutcome, PipelineError> {
        // START: the credential was injected at construction; its absence
        // is a configuration fault and never triggers a network call.
        let credential = self.credential.as_ref().ok_or(PipelineError::MissingCredential)?;

        // GENERATE_PAYLOAD
        let system_instructions = match flow {
            Flow::Query => prompts::query_system_prompt(),
            Flow::SavedSearch => prompts::saved_search_system_prompt(),
        };
        let prompt = Prompt::with_history(system_instructions, user_text, prior_turns);
        let response = self.llm.generate(&prompt, credential).await?;

        match flow {
            Flow::Query => {
                // SANITIZE → EXECUTE
                let sql = sanitize(&response.text, SanitizeKind::Query);
                let rows = self.engine.run(&sql).await.map_err(|failure| {
                    PipelineError::QueryExecution { sql: sql.clone(), detail: failure.to_string() }
                })?;
                // The bound holds for any engine implementation, not just
                // the SQL one.
                let rows: Vec<Row> = rows.into_iter().take(MAX_RESULT_ROWS).collect();

                // SYNTHESIZE
                let answer = if rows.is_empty() {
                    synthesize::no_rows_message(&sql)
                } else {
                    synthesize::summarize_rows(self.llm.as_ref(), credential, &rows, user_text)
                        .await
                        .map_err(PipelineError::Synthesis)?
                };

                Ok(PipelineOutcome { answer, sql_used: Some(sql) })
            }
            Flow::SavedSearch => {
                // SANITIZE, then parse before anything executes.
                let cleaned = sanitize(&response.text, SanitizeKind::Json);
                let spec = SavedSearchSpec::parse(&cleaned)?;

                // EXECUTE
                let reference = self.store.create(&spec).await.map_err(|failure| {
                    PipelineError::ActionCreation { detail: failure.to_string() }
                })?;

                // SYNTHESIZE: templated, no second model call.
                let answer = synthesize::saved_search_message(&spec.title, &reference.location);
                Ok(PipelineOutcome { answer, sql_used: None })
            }
        }
    }
}
