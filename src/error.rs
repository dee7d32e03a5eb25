use axum::http::StatusCode;
use thiserror::Error;

/// Failures a service call can report back to its caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Handler-side conversion into the `(status, message)` rejection.
pub fn reject(e: ServiceError) -> (StatusCode, String) {
    (e.status(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_and_statuses() {
        let nf = ServiceError::not_found("User", "42");
        assert_eq!(nf.to_string(), "User not found");
        assert_eq!(nf.status(), StatusCode::NOT_FOUND);

        let conflict = ServiceError::Conflict("Connection request already exists".into());
        assert_eq!(
            reject(conflict),
            (
                StatusCode::CONFLICT,
                "Connection request already exists".to_string()
            )
        );

        let invalid = ServiceError::InvalidInput("cannot connect with yourself".into());
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    }
}
