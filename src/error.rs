use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The catalog store could not produce a usable snapshot
    #[error("Catalog unavailable: {0}")]
    ConfigurationFailure(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ProfileNotFound(_) | AppError::ContentNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigurationFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ExternalApi(_) | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_identifier() {
        let err = AppError::ProfileNotFound("p42".to_string());
        assert_eq!(err.to_string(), "Profile not found: p42");

        let err = AppError::ContentNotFound("tt0133093".to_string());
        assert_eq!(err.to_string(), "Content not found: tt0133093");
    }

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (AppError::ProfileNotFound("p".into()), StatusCode::NOT_FOUND),
            (AppError::ContentNotFound("c".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("count".into()), StatusCode::BAD_REQUEST),
            (
                AppError::ConfigurationFailure("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::ExternalApi("502".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
