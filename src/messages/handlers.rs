use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::reject,
    messages::{
        dto::{SendMessageRequest, StartConversationRequest, UnreadCount},
        services,
    },
    models::{Ack, Conversation, Message},
    session::Session,
    state::AppState,
};

pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(list_conversations).post(start_conversation),
        )
        .route("/conversations/unread-count", get(unread_count))
        .route("/conversations/:id", get(get_conversation))
        .route("/conversations/:id/messages", post(send_message))
        .route("/conversations/:id/read", post(mark_read))
}

#[instrument(skip(state))]
pub async fn list_conversations(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Conversation>>, (StatusCode, String)> {
    services::get_conversations(&state, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state, body))]
pub async fn start_conversation(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<StartConversationRequest>,
) -> Result<Json<Conversation>, (StatusCode, String)> {
    services::get_or_create_conversation(&state, &session.user_id, &body.with)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UnreadCount>, (StatusCode, String)> {
    let count = services::get_unread_count(&state, &session.user_id)
        .await
        .map_err(reject)?;
    Ok(Json(UnreadCount { count }))
}

#[instrument(skip(state))]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, (StatusCode, String)> {
    services::get_conversation(&state, &id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state, body))]
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), (StatusCode, String)> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "content is required".into()));
    }
    let message = services::send_message(&state, &id, &session.user_id, content)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Ack>, (StatusCode, String)> {
    services::mark_as_read(&state, &id, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}
