use reqwest::Response;
use thiserror::Error;

use crate::ApiEnvelope;

#[derive(Debug, Error)]
pub enum UserClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("HTTP error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl UserClientError {
    /// Builds an [`UserClientError::Api`] from a non-success response, preferring the
    /// envelope's `message` over the raw body.
    pub async fn from_http_response(resp: Response) -> Self {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or(text);
        UserClientError::Api { status, message }
    }

    /// The message the server put in its envelope, if the server answered at all.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            UserClientError::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            UserClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
