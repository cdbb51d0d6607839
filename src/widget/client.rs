use reqwest::{ Client, StatusCode };
use thiserror::Error;

use crate::models::chat::{ ChatRequest, ChatResponse };

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(StatusCode),
}

/// Thin client for the chat endpoint: one POST per message, response shape
/// normalized at ingestion. No retry, no timeout override.
pub struct ApiClient {
    http: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        }
    }

    /// Sends one user message and returns the normalized reply text.
    pub async fn send(&self, message: &str) -> Result<String, ApiError> {
        let request = ChatRequest { message: message.to_string() };
        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_built_from_base_url() {
        let client = ApiClient::new("http://127.0.0.1:3002");
        assert_eq!(client.endpoint, "http://127.0.0.1:3002/api/chat");

        let trailing = ApiClient::new("http://127.0.0.1:3002/");
        assert_eq!(trailing.endpoint, "http://127.0.0.1:3002/api/chat");
    }
}
