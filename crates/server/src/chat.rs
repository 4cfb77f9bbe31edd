//! Assistant routes.
//!
//! HTML Endpoints:
//! - `GET  /`: embedded chat page (static HTML)
//!
//! JSON API Endpoints:
//! - `POST /api/v1/ask`: query-and-summarize flow
//! - `POST /api/v1/searches`: generate-and-persist flow
//! - `GET  /searches/{id}`: view of a persisted saved search
//!
//! Every pipeline outcome, success or failure, is a `200` with an
//! `AnswerEnvelope` JSON body: errors ride in the envelope so the chat
//! client can always parse the response.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use askledger_agent::{Flow, Pipeline};
use askledger_core::envelope::AnswerEnvelope;
use askledger_db::{SavedSearchRecord, SqlSavedSearchStore};

#[derive(Clone)]
pub struct ChatState {
    pipeline: Arc<Pipeline>,
    saved_searches: Arc<SqlSavedSearchStore>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub error: String,
}

pub fn router(pipeline: Arc<Pipeline>, saved_searches: Arc<SqlSavedSearchStore>) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/api/v1/ask", post(ask))
        .route("/api/v1/searches", post(create_search))
        .route("/searches/{id}", get(view_saved_search))
        .with_state(ChatState { pipeline, saved_searches })
}

async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../assets/chat.html"))
}

pub async fn ask(
    State(state): State<ChatState>,
    Json(request): Json<AskRequest>,
) -> Json<AnswerEnvelope> {
    Json(run_flow(&state, Flow::Query, &request.prompt).await)
}

pub async fn create_search(
    State(state): State<ChatState>,
    Json(request): Json<AskRequest>,
) -> Json<AnswerEnvelope> {
    Json(run_flow(&state, Flow::SavedSearch, &request.prompt).await)
}

async fn run_flow(state: &ChatState, flow: Flow, prompt: &str) -> AnswerEnvelope {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return AnswerEnvelope::failure("prompt must not be empty");
    }
    state.pipeline.run(flow, prompt, Vec::new()).await
}

pub async fn view_saved_search(
    Path(id): Path<String>,
    State(state): State<ChatState>,
) -> Result<Json<SavedSearchRecord>, (StatusCode, Json<NotFoundBody>)> {
    match state.saved_searches.fetch(&id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(NotFoundBody { error: format!("saved search `{id}` was not found") }),
        )),
        Err(failure) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(NotFoundBody { error: failure.to_string() }),
        )),
    }
}
