use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::llm::ChatMessage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyBody {
    pub reply: String,
}

/// Record the user's message, ask upstream with the full history, record the reply.
///
/// A failed completion leaves the user message in the transcript.
pub async fn handle_chat(state: &AppState, user_text: String) -> Result<String, ServiceError> {
    let upstream = state.upstream()?;

    let mut turn = state.conversation.begin_turn().await;
    turn.append(ChatMessage::user(user_text));
    let history = turn.snapshot();
    tracing::info!(messages = history.len(), "forwarding chat message");

    let reply = state.complete(&upstream, history).await?;
    turn.append(ChatMessage::assistant(reply.clone()));

    Ok(reply)
}

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ReplyBody>, ServiceError> {
    let reply = handle_chat(&state, body.message).await?;
    Ok(Json(ReplyBody { reply }))
}
