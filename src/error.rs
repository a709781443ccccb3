use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Error surface for every handler. Client-facing messages never reveal
/// whether an email is registered, beyond the explicit duplicate answer on
/// registration.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Access denied")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            // Full detail stays server-side; the client gets a generic body.
            error!(error = ?err, "internal error");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // Unique violation on users.email reads the same as the duplicate
        // pre-check, so a racing second insert is rejected identically.
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some("23505") {
                return Self::DuplicateEmail;
            }
        }
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_error_kinds() {
        assert_eq!(
            ApiError::Validation("Name is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Product").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_body_is_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("pool timed out on pg:5432"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn credential_failures_share_one_message() {
        // Unknown email and wrong password must be indistinguishable.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
    }

    #[derive(Debug)]
    struct FakeDbError(&'static str);

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "database error with SQLSTATE {}", self.0)
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(self.0.into())
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                "23505" => sqlx::error::ErrorKind::UniqueViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_maps_to_duplicate_email() {
        // A racing second insert must reject like the pre-check does.
        let err: ApiError = sqlx::Error::Database(Box::new(FakeDbError("23505"))).into();
        assert!(matches!(err, ApiError::DuplicateEmail));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err: ApiError = sqlx::Error::Database(Box::new(FakeDbError("40001"))).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
