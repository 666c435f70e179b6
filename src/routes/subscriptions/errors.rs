use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode,
};

use super::super::helpers::error_chain_fmt;
use super::types::SubscribeResponse;

pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to subscribe. Please try again.";

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            SubscribeError::ValidationError(message) => SubscribeResponse::failure(message),
            SubscribeError::UnexpectedError(_) => {
                SubscribeResponse::failure(GENERIC_FAILURE_MESSAGE)
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Turns body extraction failures (bad JSON, missing `email`, wrong content type) into the
/// same 400 shape as a failed email check.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error.message = %err, "Rejected malformed subscription body");
    SubscribeError::ValidationError("Invalid request body".into()).into()
}
