use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::{debug, warn};

use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the user acting in a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .map(|v| v.to_str().map(str::trim));

        match header {
            Some(Ok(id)) if !id.is_empty() => return Ok(Session::new(id)),
            Some(_) => {
                warn!("malformed identity header");
                return Err((StatusCode::UNAUTHORIZED, "invalid X-User-Id header".into()));
            }
            None => {}
        }

        if !state.config.default_identity {
            return Err((StatusCode::UNAUTHORIZED, "missing X-User-Id header".into()));
        }

        // identity resolution is not a simulated call
        let users = state.store.users.read().await;
        let first = users.first().ok_or((
            StatusCode::UNAUTHORIZED,
            "no default identity available".to_string(),
        ))?;
        debug!(user_id = %first.id, "using default identity");
        Ok(Session::new(first.id.clone()))
    }
}
