// src/error.rs
// Error types. RunError covers one simulation run and ends up as the view's error text;
// ViewError is what the HTTP handlers return to actix.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use awc::error::{PayloadError, SendRequestError};

use crate::model::UnknownField;

/// Failure of a single run against the simulation service.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The request could not be sent or no response came back. Displays the transport message unchanged.
    #[error("{0}")]
    Network(#[from] SendRequestError),

    #[error("{0}")]
    Payload(#[from] PayloadError),

    #[error("Server error: {status}")]
    Server { status: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Errors surfaced by the web handlers.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl From<UnknownField> for ViewError {
    fn from(UnknownField(name): UnknownField) -> Self {
        ViewError::UnknownField(name)
    }
}

impl ResponseError for ViewError {
    fn status_code(&self) -> StatusCode {
        match self {
            ViewError::UnknownField(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
