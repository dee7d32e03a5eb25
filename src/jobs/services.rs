use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::jobs::dto::{ApplicationReceipt, ApplicationRequest, JobFilters};
use crate::jobs::repo;
use crate::latency::Op;
use crate::models::{generate_id, Job};
use crate::state::AppState;

fn not_found(id: &str) -> ServiceError {
    warn!(job_id = %id, "job not found");
    ServiceError::not_found("Job", id)
}

pub async fn get_all(st: &AppState) -> ServiceResult<Vec<Job>> {
    st.pause(Op::JobsGetAll).await;
    let mut jobs = st.store.jobs.read().await.clone();
    repo::sort_newest_first(&mut jobs);
    Ok(jobs)
}

pub async fn get_by_id(st: &AppState, id: &str) -> ServiceResult<Job> {
    st.pause(Op::JobsGetById).await;
    st.store
        .jobs
        .read()
        .await
        .iter()
        .find(|j| j.id == id)
        .cloned()
        .ok_or_else(|| not_found(id))
}

pub async fn search_jobs(st: &AppState, filters: &JobFilters) -> ServiceResult<Vec<Job>> {
    st.pause(Op::JobsSearch).await;
    let mut hits: Vec<Job> = st
        .store
        .jobs
        .read()
        .await
        .iter()
        .filter(|j| filters.matches(j))
        .cloned()
        .collect();
    repo::sort_newest_first(&mut hits);
    debug!(?filters, hits = hits.len(), "job search");
    Ok(hits)
}

/// `limit` jobs in random order. Not personalised; `user_id` is only logged.
pub async fn get_recommended(
    st: &AppState,
    user_id: &str,
    limit: usize,
) -> ServiceResult<Vec<Job>> {
    st.pause(Op::JobsRecommended).await;
    let mut jobs = st.store.jobs.read().await.clone();
    jobs.shuffle(&mut rand::thread_rng());
    jobs.truncate(limit);
    debug!(user_id, count = jobs.len(), "recommended jobs");
    Ok(jobs)
}

/// Confirms an application without recording it anywhere.
pub async fn apply_to_job(
    st: &AppState,
    job_id: &str,
    user_id: &str,
    application: ApplicationRequest,
) -> ServiceResult<ApplicationReceipt> {
    st.pause(Op::JobsApply).await;
    if !st.store.jobs.read().await.iter().any(|j| j.id == job_id) {
        return Err(not_found(job_id));
    }
    let receipt = ApplicationReceipt {
        success: true,
        application_id: generate_id(),
        message: "Application submitted successfully".into(),
    };
    info!(
        job_id,
        user_id,
        application_id = %receipt.application_id,
        has_cover_letter = application.cover_letter.is_some(),
        "job application submitted"
    );
    Ok(receipt)
}
