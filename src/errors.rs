use axum::http::StatusCode;
use thiserror::Error;

pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Failure of an outbound call to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend rejected request ({status}): {detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("no access token stored")]
    MissingToken,
}

impl ApiError {
    /// Text shown to the user in a transient alert.
    pub fn alert_message(&self) -> String {
        match self {
            ApiError::Rejected { detail, .. } => detail.clone(),
            ApiError::MissingToken => "Please log in first".to_string(),
            ApiError::Network(_) | ApiError::UnexpectedResponse(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
