//! GraphQL over HTTP
//!
//! Request/response envelopes, the [`Operation`] contract every query and
//! mutation implements, and the [`GraphQlTransport`] port that moves a
//! request body to the server and back.
//!
//! ## Data Flow
//!
//! 1. [`GraphQlClient::execute`] serializes an operation into a request body
//! 2. The transport POSTs it (with a bearer token for authenticated operations)
//! 3. [`GraphQlResponse::from_http`] turns the HTTP reply into an envelope
//! 4. [`GraphQlResponse::into_data`] yields typed data or a [`ClientError`]

mod client;
pub mod operations;

pub use client::GraphQlClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Request body sent to the GraphQL endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub operation_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

impl GraphQlRequest {
    /// Build the request body for an operation
    ///
    /// Operations without variables (`Variables = ()`) omit the field.
    pub fn for_operation<O: Operation>(variables: &O::Variables) -> ClientResult<Self> {
        let variables = match serde_json::to_value(variables)? {
            serde_json::Value::Null => None,
            value => Some(value),
        };

        Ok(Self {
            query: O::DOCUMENT,
            operation_name: O::NAME,
            variables,
        })
    }
}

/// Response envelope returned by the GraphQL endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

impl GraphQlResponse {
    /// Interpret a raw HTTP reply
    ///
    /// Servers commonly answer validation and auth failures with a non-2xx
    /// status and a regular `errors` body, so the body is tried first and the
    /// status only decides when it is not a GraphQL envelope.
    pub fn from_http(status: u16, body: &str) -> ClientResult<Self> {
        let success = (200..300).contains(&status);

        match serde_json::from_str::<GraphQlResponse>(body) {
            Ok(response) if success || !response.errors.is_empty() => Ok(response),
            Ok(_) => Err(ClientError::Http {
                status,
                message: truncate(body, 200),
            }),
            Err(_) if !success => Err(ClientError::Http {
                status,
                message: truncate(body, 200),
            }),
            Err(e) => Err(ClientError::Decode(e.to_string())),
        }
    }

    /// Convert the envelope into typed data
    ///
    /// Any entry in `errors` wins over partial data.
    pub fn into_data<T: DeserializeOwned>(self, operation: &'static str) -> ClientResult<T> {
        if !self.errors.is_empty() {
            return Err(ClientError::GraphQl(self.errors));
        }

        match self.data {
            None | Some(serde_json::Value::Null) => Err(ClientError::MissingData(operation)),
            Some(data) => Ok(serde_json::from_value(data)?),
        }
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// `Authorization` header value for a bearer token
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// A typed GraphQL operation
pub trait Operation {
    /// Operation name, matches the name in [`Self::DOCUMENT`]
    const NAME: &'static str;

    /// GraphQL document text
    const DOCUMENT: &'static str;

    /// Whether the request must carry the session's bearer token
    const AUTHENTICATED: bool;

    type Variables: Serialize;

    /// Shape of the `data` object
    type Data: DeserializeOwned;

    /// What callers get back
    type Output;

    /// Extract the output from the decoded data
    fn output(data: Self::Data) -> ClientResult<Self::Output>;
}

/// Moves a GraphQL request body to the endpoint and returns the envelope
#[async_trait(?Send)]
pub trait GraphQlTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
        bearer: Option<&str>,
    ) -> ClientResult<GraphQlResponse>;
}
