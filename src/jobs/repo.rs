use crate::models::Job;

/// Newest `posted` first.
pub(crate) fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.posted.cmp(&a.posted));
}
