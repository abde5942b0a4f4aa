use axum::{ extract::rejection::BytesRejection, http::StatusCode, response::{ IntoResponse, Response }, Json };
use thiserror::Error;

use crate::llm::LlmError;
use crate::models::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("GEMINI_API_KEY is not configured on the server")]
    Configuration,
    #[error("Request body must be JSON of the form {{\"prompt\": string, \"conversation\"?: [{{\"role\", \"content\"}}]}}")]
    MalformedRequest(#[source] serde_json::Error),
    #[error("Request body could not be read: {0}")]
    UnreadableBody(#[source] BytesRejection),
    #[error("Prompt is required")]
    Validation,
    #[error("The model returned an empty response")]
    EmptyResponse,
    #[error("The model response was not valid JSON")]
    UnparsableResponse(#[source] serde_json::Error),
    #[error("The model response is missing a reply or html field")]
    IncompleteResponse,
    #[error("The model service request failed")]
    Upstream(#[from] LlmError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MalformedRequest(_)
            | RelayError::UnreadableBody(_)
            | RelayError::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: self.to_string() };
        (self.status_code(), Json(body)).into_response()
    }
}
