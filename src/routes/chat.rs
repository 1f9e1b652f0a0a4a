//! `POST /api/chat`: turns in, `{content, citations}` or `{error}` out.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use conversations::ChatRequest;

use crate::services::chat::{ChatError, handle_chat};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub async fn chat(State(state): State<AppState>, payload: Result<Json<ChatRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "chat: rejected request body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match handle_chat(&state, &request.messages).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            error!(code = e.error_code(), error = %e, "chat: request failed");
            error_response(chat_error_to_status(&e), e.to_string())
        }
    }
}

pub(crate) fn chat_error_to_status(err: &ChatError) -> StatusCode {
    match err {
        ChatError::LlmNotConfigured | ChatError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ChatError::Upstream { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
