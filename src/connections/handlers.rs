use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    connections::{dto::ConnectionRequestBody, services},
    error::reject,
    models::{Ack, Connection},
    session::Session,
    state::AppState,
};

pub fn connection_routes() -> Router<AppState> {
    Router::new()
        .route("/connections", get(list_connections))
        .route("/connections/pending", get(list_pending))
        .route("/connections/requests", post(send_request))
        .route("/connections/requests/:from/accept", post(accept_request))
        .route("/connections/requests/:from/reject", post(reject_request))
        .route("/connections/:user_id", delete(remove_connection))
}

#[instrument(skip(state))]
pub async fn list_connections(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Connection>>, (StatusCode, String)> {
    services::get_by_user_id(&state, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn list_pending(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Connection>>, (StatusCode, String)> {
    services::get_pending_requests(&state, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state, body))]
pub async fn send_request(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ConnectionRequestBody>,
) -> Result<(StatusCode, Json<Connection>), (StatusCode, String)> {
    let conn = services::send_request(&state, &session.user_id, &body.to, &body.message)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(conn)))
}

#[instrument(skip(state))]
pub async fn accept_request(
    State(state): State<AppState>,
    session: Session,
    Path(from): Path<String>,
) -> Result<Json<Connection>, (StatusCode, String)> {
    services::accept_request(&state, &from, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn reject_request(
    State(state): State<AppState>,
    session: Session,
    Path(from): Path<String>,
) -> Result<Json<Ack>, (StatusCode, String)> {
    services::reject_request(&state, &from, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn remove_connection(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
) -> Result<Json<Ack>, (StatusCode, String)> {
    services::remove_connection(&state, &session.user_id, &user_id)
        .await
        .map(Json)
        .map_err(reject)
}
