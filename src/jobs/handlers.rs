use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::reject,
    jobs::{
        dto::{ApplicationReceipt, ApplicationRequest, JobFilters, JobSearchQuery},
        services,
    },
    models::Job,
    session::Session,
    state::AppState,
    users::dto::LimitQuery,
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/search", get(search_jobs))
        .route("/jobs/recommended", get(recommended_jobs))
        .route("/jobs/:id", get(get_job))
        .route("/jobs/:id/apply", post(apply_to_job))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Job>>, (StatusCode, String)> {
    services::get_all(&state).await.map(Json).map_err(reject)
}

#[instrument(skip(state))]
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(q): Query<JobSearchQuery>,
) -> Result<Json<Vec<Job>>, (StatusCode, String)> {
    let filters = JobFilters::from(q);
    services::search_jobs(&state, &filters)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn recommended_jobs(
    State(state): State<AppState>,
    session: Session,
    Query(p): Query<LimitQuery>,
) -> Result<Json<Vec<Job>>, (StatusCode, String)> {
    services::get_recommended(&state, &session.user_id, p.limit)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, (StatusCode, String)> {
    services::get_by_id(&state, &id).await.map(Json).map_err(reject)
}

#[instrument(skip(state, body))]
pub async fn apply_to_job(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    body: Option<Json<ApplicationRequest>>,
) -> Result<(StatusCode, Json<ApplicationReceipt>), (StatusCode, String)> {
    let application = body.map(|Json(b)| b).unwrap_or_default();
    let receipt = services::apply_to_job(&state, &id, &session.user_id, application)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
