use std::time::Instant;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{Router, get, post};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;
use crate::AppState;
use crate::answer::Answer;
use crate::error::RelayError;
use crate::logger::LedgerEntry;
use crate::models::{AnswerResponse, PromptRequest};

pub fn router(state: AppState) -> Router {

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/answer", post(answer_handler))
        .with_state(state)

}

pub async fn health_check() -> &'static str {

    "OK"

}

pub async fn metrics_handler(State(state): State<AppState>) -> Json<Value> {

    let snapshot = state.metrics.snapshot();
    let success_rate = snapshot.success_rate();

    Json(json!({
        "requests": snapshot,
        "success_rate_percent": success_rate
    }))

}

pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>
) -> Result<Json<AnswerResponse>, RelayError> {

    let answer = relay_prompt(&state, payload).await?;

    Ok(Json(AnswerResponse { answer: answer.text }))

}

// like /api/chat but with source text, category and policy card when known
pub async fn answer_handler(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>
) -> Result<Json<Answer>, RelayError> {

    let answer = relay_prompt(&state, payload).await?;

    Ok(Json(answer))

}

async fn relay_prompt(
    state: &AppState,
    payload: Result<Json<PromptRequest>, JsonRejection>
) -> Result<Answer, RelayError> {

    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let prompt = match payload {
        Ok(Json(request)) => request.prompt,
        Err(rejection) => {
            let err = RelayError::InvalidRequest(rejection.body_text());
            warn!(%request_id, error = %err, "rejected inbound request");
            finish(state, request_id, started, "", Err(&err));
            return Err(err);
        }
    };

    info!(%request_id, prompt_chars = prompt.chars().count(), "relaying prompt");

    let result = state.answers.answer(&prompt).await;

    match &result {
        Ok(answer) => {
            info!(%request_id, answer_chars = answer.text.chars().count(), "answered");
            finish(state, request_id, started, &prompt, Ok(answer));
        }
        Err(err) => {
            warn!(%request_id, error = %err, status = err.status_code().as_u16(), "relay failed");
            finish(state, request_id, started, &prompt, Err(err));
        }
    }

    result

}

fn finish(
    state: &AppState,
    request_id: Uuid,
    started: Instant,
    prompt: &str,
    result: Result<&Answer, &RelayError>
) {

    let (outcome, status) = match result {
        Ok(answer) => {
            state.metrics.record_answer(answer.text.is_empty(), answer.tokens_used);
            let outcome = if answer.text.is_empty() { "EMPTY" } else { "ANSWERED" };
            (outcome, StatusCode::OK.as_u16())
        }
        Err(err) => {
            state.metrics.record_error(err);
            (err.outcome(), err.status_code().as_u16())
        }
    };

    state.request_log.record(&LedgerEntry {
        request_id,
        outcome,
        model: state.answers.model(),
        status,
        latency_ms: started.elapsed().as_millis(),
        prompt,
    });

}
