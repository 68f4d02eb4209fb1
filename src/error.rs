use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    BadRequest(String),
    /// The inbound body could not be read, e.g. it exceeded the body limit.
    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),
    #[error("Field 'text' must be a non-empty string")]
    EmptyText,
    #[error("Text too long (limit ~20k chars for demo)")]
    TextTooLong,
    #[error("Proxy error: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Proxy error: {0}")]
    Other(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) | RelayError::EmptyText => StatusCode::BAD_REQUEST,
            RelayError::TextTooLong => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Body(rejection) => rejection.status(),
            RelayError::Upstream(_) | RelayError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
