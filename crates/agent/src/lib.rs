//! The three-stage query pipeline behind the askledger assistant.
//!
//! A request flows strictly forward:
//! 1. **Payload generation** (`llm`, `gemini`, `prompts`) - translate the
//!    user's text into raw SQL or a saved-search JSON spec, under a fixed
//!    schema description and strict output-format instructions.
//! 2. **Sanitize + execute** (`pipeline` + the datastore seams in core) -
//!    strip formatting artifacts, then run the payload against the
//!    read-only query engine or the saved-search store.
//! 3. **Synthesis** (`synthesize`) - turn the execution result back into a
//!    user-facing answer, via a second model call or a deterministic
//!    template.
//!
//! # Safety principle
//!
//! The model is strictly a translator. It never mutates the datastore and
//! its output is never executed unparsed; every failure below the
//! orchestrator is caught there and mapped to a single answer envelope.

pub mod gemini;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod synthesize;

pub use gemini::GeminiClient;
pub use llm::{LlmClient, LlmError};
pub use pipeline::{Flow, Pipeline, PipelineError};
