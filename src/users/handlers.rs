use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::reject,
    models::{Post, User},
    posts,
    session::Session,
    state::AppState,
    users::{
        dto::{LimitQuery, SearchQuery, UserPatch},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/search", get(search_users))
        .route("/users/current", get(current_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/connections", get(list_connections))
        .route("/users/:id/suggested", get(list_suggested))
        .route("/users/:id/posts", get(list_posts_by_author))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    services::get_all(&state).await.map(Json).map_err(reject)
}

#[instrument(skip(state))]
pub async fn search_users(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    services::search_users(&state, &q.q)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
) -> Result<Json<User>, (StatusCode, String)> {
    services::current_user(&state).await.map(Json).map_err(reject)
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, (StatusCode, String)> {
    services::get_by_id(&state, &id).await.map(Json).map_err(reject)
}

#[instrument(skip(state))]
pub async fn list_connections(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    services::get_connections(&state, &id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn list_suggested(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(p): Query<LimitQuery>,
) -> Result<Json<Vec<User>>, (StatusCode, String)> {
    services::get_suggested(&state, &id, p.limit)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn list_posts_by_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Post>>, (StatusCode, String)> {
    posts::services::get_by_author(&state, &id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<User>, (StatusCode, String)> {
    services::get_by_id(&state, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state, patch))]
pub async fn update_me(
    State(state): State<AppState>,
    session: Session,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, (StatusCode, String)> {
    services::update_profile(&state, &session.user_id, patch)
        .await
        .map(Json)
        .map_err(reject)
}
