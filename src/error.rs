use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External data unavailable: {0}")]
    ExternalDataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AppError {
    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ExternalDataUnavailable(_) | AppError::Timeout(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalDataUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            AppError::Configuration(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "retryable": retryable,
        }));

        (status, body).into_response()
    }
}

/// Any failed read against the relationship store is a collaborator outage
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::ExternalDataUnavailable(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(AppError::ExternalDataUnavailable("db down".into()).is_retryable());
        assert!(AppError::Timeout("slow".into()).is_retryable());
        assert!(AppError::from(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!AppError::InvalidInput("bad id".into()).is_retryable());
        assert!(!AppError::Configuration("no default".into()).is_retryable());
    }

    #[test]
    fn test_sqlx_error_maps_to_external_data_unavailable() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::ExternalDataUnavailable(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::ExternalDataUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Timeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (
                AppError::Configuration("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
