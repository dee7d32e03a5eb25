use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    error::reject,
    models::{Ack, Post},
    posts::{
        dto::{CommentRequest, CreatePostRequest, NewComment, NewPost, PostPatch},
        services,
    },
    session::Session,
    state::AppState,
};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/posts/:id/like", post(like_post))
        .route("/posts/:id/comments", post(add_comment))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, (StatusCode, String)> {
    services::get_all(&state).await.map(Json).map_err(reject)
}

#[instrument(skip(state, body))]
pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), (StatusCode, String)> {
    let content = body.content.trim();
    if content.is_empty() {
        warn!("empty post content");
        return Err((StatusCode::BAD_REQUEST, "content is required".into()));
    }
    let new_post = NewPost {
        author_id: session.user_id,
        content: content.to_string(),
        kind: body.kind,
    };
    let post = services::create(&state, new_post).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, (StatusCode, String)> {
    services::get_by_id(&state, &id).await.map(Json).map_err(reject)
}

#[instrument(skip(state, patch))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PostPatch>,
) -> Result<Json<Post>, (StatusCode, String)> {
    services::update(&state, &id, patch)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, (StatusCode, String)> {
    services::delete(&state, &id).await.map(Json).map_err(reject)
}

#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Post>, (StatusCode, String)> {
    services::like_post(&state, &id, &session.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state, body))]
pub async fn add_comment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Post>), (StatusCode, String)> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "content is required".into()));
    }
    let comment = NewComment {
        author_id: session.user_id,
        content: content.to_string(),
    };
    let post = services::add_comment(&state, &id, comment)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(post)))
}
