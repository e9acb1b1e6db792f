//! HTTP API Client
//!
//! `fetch`-backed implementations of the GraphQL transport and the upload
//! endpoint.

use async_trait::async_trait;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

use mediadesk::graphql::{bearer_header, GraphQlRequest, GraphQlResponse, GraphQlTransport};
use mediadesk::upload::{parse_upload_response, FileUploader, UPLOAD_FIELD, UPLOAD_PATH};
use mediadesk::{ClientError, ClientResult};

/// Default GraphQL endpoint when none was set at build time
pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:3000/graphql";

/// GraphQL endpoint baked in at build time (`MEDIADESK_GRAPHQL_URL`)
pub fn graphql_url() -> &'static str {
    option_env!("MEDIADESK_GRAPHQL_URL").unwrap_or(DEFAULT_GRAPHQL_URL)
}

/// GraphQL transport over `fetch`
pub struct FetchTransport {
    endpoint: String,
}

impl FetchTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait(?Send)]
impl GraphQlTransport for FetchTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
        bearer: Option<&str>,
    ) -> ClientResult<GraphQlResponse> {
        let mut builder = Request::post(&self.endpoint);
        if let Some(token) = bearer {
            builder = builder.header("Authorization", &bearer_header(token));
        }

        let response = builder
            .json(request)
            .map_err(|e| ClientError::Transport(format!("Request build error: {}", e)))?
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        GraphQlResponse::from_http(status, &body)
    }
}

/// Same-origin multipart uploader
pub struct FormUploader {
    endpoint: String,
}

impl FormUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for FormUploader {
    fn default() -> Self {
        Self::new(UPLOAD_PATH)
    }
}

#[async_trait(?Send)]
impl FileUploader for FormUploader {
    type File = File;

    async fn upload(&self, file: &File) -> ClientResult<String> {
        let form = FormData::new().map_err(upload_error)?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
            .map_err(upload_error)?;

        let response = Request::post(&self.endpoint)
            .body(form)
            .map_err(|e| ClientError::Upload(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        parse_upload_response(status, &body)
    }
}

fn upload_error(value: JsValue) -> ClientError {
    ClientError::Upload(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
