use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use thiserror::Error;

use crate::models::api::{ ErrorResponse, GenerateRequest, GenerateResponse };
use crate::server::api::GENERATE_ROUTE;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Could not reach the relay: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("Request failed with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, TransportError>;
}

pub struct HttpRelayClient {
    http: HttpClient,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(relay_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: format!("{}{}", relay_url.trim_end_matches('/'), GENERATE_ROUTE),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Error for a non-success relay response: its `error` field when the body has one.
pub fn rejection_from_body(status: u16, body: &str) -> TransportError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(e) if !e.error.trim().is_empty() => TransportError::Rejected(e.error),
        _ => TransportError::Status(status),
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, TransportError> {
        debug!("POST {} with {} history turn(s)", self.endpoint, request.conversation.len());
        let resp = self.http.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection_from_body(status.as_u16(), &body));
        }

        Ok(resp.json::<GenerateResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_route_once() {
        assert_eq!(HttpRelayClient::new("http://localhost:4000/").endpoint(), "http://localhost:4000/api/generate");
        assert_eq!(HttpRelayClient::new("http://localhost:4000").endpoint(), "http://localhost:4000/api/generate");
    }

    #[test]
    fn rejection_prefers_server_message() {
        let err = rejection_from_body(400, r#"{"error":"Prompt is required"}"#);
        assert_eq!(err.to_string(), "Prompt is required");

        let err = rejection_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");

        let err = rejection_from_body(500, r#"{"error":""}"#);
        assert_eq!(err.to_string(), "Request failed with status 500");
    }
}
