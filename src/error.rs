//! Client error types
//!
//! Every failure the page controller can observe, from a dropped connection
//! to a GraphQL `errors` array, is one of these variants.

use thiserror::Error;

use crate::graphql::GraphQlError;

/// Errors that can occur while talking to the media API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure, timeout or refused connection
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response that did not carry a GraphQL error body
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Server-reported GraphQL errors
    #[error("{}", first_message(.0))]
    GraphQl(Vec<GraphQlError>),

    /// Response carried neither `data` nor `errors`
    #[error("No data returned for {0}")]
    MissingData(&'static str),

    /// Response body was not the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Upload endpoint failure
    #[error("Upload error: {0}")]
    Upload(String),

    /// Mutation payload reported failure
    #[error("{0}")]
    Rejected(String),

    /// Authenticated operation attempted with no stored token
    #[error("Not logged in")]
    NoSession,

    /// Token store read or write failed
    #[error("Storage error: {0}")]
    Storage(String),
}

fn first_message(errors: &[GraphQlError]) -> &str {
    errors
        .first()
        .map(|e| e.message.as_str())
        .unwrap_or("Unknown GraphQL error")
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport("request timed out".to_string())
        } else if err.is_connect() {
            ClientError::Transport(format!("connection failed: {}", err))
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
