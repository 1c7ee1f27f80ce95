use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// A payload that does not honour the restaurant listing contract.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("malformed restaurant payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("restaurant at position {position} has an empty id")]
    EmptyId { position: usize },
    #[error("restaurant id `{0}` appears more than once")]
    DuplicateId(String),
    #[error("total_results {total} is smaller than the {returned} restaurants returned")]
    TotalResultsBelowPage { total: u64, returned: u64 },
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error("failed to read restaurant data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid page token `{0}`")]
    InvalidPageToken(String),
    #[error("page size must be between 1 and {max}, got {requested}")]
    InvalidPageSize { requested: usize, max: usize },
    #[error("restaurant `{0}` not found")]
    NotFound(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl DirectoryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::InvalidPageToken(_)
            | DirectoryError::InvalidPageSize { .. }
            | DirectoryError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::Contract(_) | DirectoryError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn status_marker(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "invalid_request",
            StatusCode::NOT_FOUND => "not_found",
            _ => "error",
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Restaurant directory failure");
            "Something went wrong, please try again!".to_string()
        } else {
            self.to_string()
        };

        error_body(status, self.status_marker(), message)
    }
}

pub fn error_body(status: StatusCode, marker: &str, message: String) -> Response {
    (status, Json(json!({ "status": marker, "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            DirectoryError::InvalidPageToken("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DirectoryError::InvalidPageSize { requested: 0, max: 100 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DirectoryError::InvalidQuery("missing field".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DirectoryError::NotFound("r1".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DirectoryError::from(ContractError::DuplicateId("r1".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = DirectoryError::from(ContractError::DuplicateId("secret".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert!(!json["error"].as_str().unwrap().contains("secret"));
    }
}
