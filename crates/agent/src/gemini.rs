use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use askledger_core::config::LlmConfig;
use askledger_core::prompt::{ModelResponse, Prompt, TurnRole};

use crate::llm::{LlmClient, LlmError};

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Gemini `generateContent` client.
///
/// The credential travels in the `x-goog-api-key` header, never in the
/// URL, and is never written to a log record.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let http =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, prompt: &Prompt) -> GenerateRequest {
        let mut contents = Vec::with_capacity(prompt.prior_turns.len() + 1);
        for turn in &prompt.prior_turns {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "model",
            };
            contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![Part { text: turn.text.clone() }],
            });
        }
        // System instructions ride in the final user part; the backend
        // weighs a strong prompt prefix more reliably than history alone.
        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![Part { text: prompt.combined_text() }],
        });

        GenerateRequest {
            contents,
            generation_config: GenerationConfig { temperature: self.temperature },
        }
    }

    async fn attempt(
        &self,
        request: &GenerateRequest,
        credential: &SecretString,
    ) -> Result<ModelResponse, LlmError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", credential.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|source| LlmError::Request { detail: source.to_string() })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| LlmError::Request { detail: source.to_string() })?;

        if !status.is_success() {
            error!(
                event_name = "llm.gemini.transport_failure",
                status = status.as_u16(),
                body = %body,
                "generation backend returned non-success status"
            );
            return Err(LlmError::Transport { status: status.as_u16(), body });
        }

        let envelope: GenerateResponse = serde_json::from_str(body.trim()).map_err(|source| {
            error!(
                event_name = "llm.gemini.parse_failure",
                body = %body,
                error = %source,
                "generation backend body was not the expected envelope"
            );
            LlmError::Malformed { detail: source.to_string() }
        })?;

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text);

        match text {
            Some(text) if !text.is_empty() => Ok(ModelResponse { text }),
            _ => {
                // Distinct from transport failure in the logs: the call
                // succeeded but safety filters or quota ate the content.
                warn!(
                    event_name = "llm.gemini.empty_result",
                    "generation backend returned no candidate content"
                );
                Err(LlmError::EmptyResult)
            }
        }
    }
}

fn retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Request { .. } => true,
        LlmError::Transport { status, .. } => *status >= 500,
        LlmError::Malformed { .. } | LlmError::EmptyResult => false,
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &Prompt,
        credential: &SecretString,
    ) -> Result<ModelResponse, LlmError> {
        let request = self.build_request(prompt);

        let mut attempt_index = 0;
        loop {
            match self.attempt(&request, credential).await {
                Ok(response) => return Ok(response),
                Err(failure) if retryable(&failure) && attempt_index < self.max_retries => {
                    attempt_index += 1;
                    warn!(
                        event_name = "llm.gemini.retry",
                        attempt = attempt_index,
                        error = %failure,
                        "retrying transport failure"
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}
