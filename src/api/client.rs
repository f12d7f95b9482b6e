//! HTTP client for the remote chat endpoint.
//!
//! One request per user message, no streaming, no retry, no timeout. The
//! client keeps a cookie jar so the service can correlate consecutive
//! requests into one server-side session.

use std::fmt;

use reqwest::{Client, StatusCode};

use crate::api::{CharacterContext, ChatReply, ChatRequest};
use crate::utils::url::construct_api_url;

/// Errors from a single chat request.
#[derive(Debug)]
pub enum ChatError {
    /// The request never produced a response (connection refused, DNS, ...).
    Http(reqwest::Error),

    /// The service answered with a non-2xx status.
    Status(StatusCode),

    /// The response body was not the expected JSON shape.
    Body(reqwest::Error),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Http(err) => write!(f, "chat request failed: {err}"),
            ChatError::Status(status) => write!(f, "chat request failed with status {status}"),
            ChatError::Body(err) => write!(f, "chat response could not be decoded: {err}"),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Http(err) | ChatError::Body(err) => Some(err),
            ChatError::Status(_) => None,
        }
    }
}

pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(api_base: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            endpoint: construct_api_url(api_base, "api/chat"),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(
        &self,
        message: &str,
        context: CharacterContext,
    ) -> Result<ChatReply, ChatError> {
        let request = ChatRequest {
            message: message.to_string(),
            character_context: context,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ChatError::Http)?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status()));
        }

        response.json::<ChatReply>().await.map_err(ChatError::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_without_double_slashes() {
        let client = ChatClient::new("http://localhost:4000/").expect("client");
        assert_eq!(client.endpoint(), "http://localhost:4000/api/chat");
    }

    #[test]
    fn status_errors_carry_the_status_code() {
        let err = ChatError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("500"));
    }
}
