use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Domain error taxonomy. Everything except `Internal` is an expected
/// failure that surfaces to the client as an `{ok:false, error}` body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidCredentials(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(anyhow::Error::new(e))
    }
}

impl AppError {
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Internal(_))
    }
}

/// Structured success/failure pair every mutation answers with. `error`
/// serializes as `null` on success.
#[derive(Debug, Serialize)]
pub struct MutationOutput {
    pub ok: bool,
    pub error: Option<String>,
}

impl MutationOutput {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Map a mutation result onto the wire contract: expected failures become
/// `{ok:false, error}`, internal failures become a logged 500.
pub fn mutation_response(
    result: Result<(), AppError>,
) -> Result<Json<MutationOutput>, (StatusCode, String)> {
    match result {
        Ok(()) => Ok(Json(MutationOutput::ok())),
        Err(AppError::Internal(e)) => {
            error!(error = %e, "internal error");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            ))
        }
        Err(e) => Ok(Json(MutationOutput::fail(e.to_string()))),
    }
}

/// Same mapping for internal errors on non-mutation paths.
pub fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_failures_become_outcome_bodies() {
        let res = mutation_response(Err(AppError::NotFound("Restaurant not found".into())));
        let body = res.expect("expected failure is not an http error").0;
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some("Restaurant not found"));
    }

    #[test]
    fn internal_failures_become_500() {
        let res = mutation_response(Err(AppError::Internal(anyhow::anyhow!("db down"))));
        let (status, msg) = res.expect_err("internal must be an http error");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // Never leak the underlying cause.
        assert_eq!(msg, "Internal server error");
    }

    #[test]
    fn success_serializes_with_null_error() {
        let body = mutation_response(Ok(())).unwrap().0;
        assert!(body.ok);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], serde_json::Value::Null);
    }
}
