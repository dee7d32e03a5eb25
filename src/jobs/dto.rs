use serde::{Deserialize, Serialize};

use crate::models::Job;

/// Job search constraints; absent fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub remote: Option<bool>,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl JobFilters {
    pub(crate) fn matches(&self, job: &Job) -> bool {
        if let Some(title) = &self.title {
            if !contains_ci(&job.title, title) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if &job.job_type != job_type {
                return false;
            }
        }
        if let Some(remote) = self.remote {
            if job.remote != remote {
                return false;
            }
        }
        if !self.skills.is_empty()
            && !self
                .skills
                .iter()
                .any(|skill| job.requirements.iter().any(|req| contains_ci(req, skill)))
        {
            return false;
        }
        true
    }
}

/// Query-string form of [`JobFilters`]; `skills` is comma-separated.
#[derive(Debug, Deserialize)]
pub struct JobSearchQuery {
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub remote: Option<bool>,
    pub skills: Option<String>,
}

impl From<JobSearchQuery> for JobFilters {
    fn from(q: JobSearchQuery) -> Self {
        let skills = q
            .skills
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            title: q.title.filter(|s| !s.is_empty()),
            location: q.location.filter(|s| !s.is_empty()),
            job_type: q.job_type.filter(|s| !s.is_empty()),
            remote: q.remote,
            skills,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceipt {
    pub success: bool,
    pub application_id: String,
    pub message: String,
}
