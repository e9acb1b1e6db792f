//! HTTP implementations of the transport ports
//!
//! `reqwest` clients for the GraphQL endpoint and the multipart upload
//! endpoint. Used by the terminal front end.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::graphql::{GraphQlRequest, GraphQlResponse, GraphQlTransport};
use crate::upload::{parse_upload_response, FileUploader, UploadFile, UPLOAD_FIELD};

/// Build the shared HTTP client
pub fn build_client(timeout: Duration) -> ClientResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("mediadesk/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::from)
}

/// GraphQL transport over `reqwest`
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait(?Send)]
impl GraphQlTransport for HttpTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
        bearer: Option<&str>,
    ) -> ClientResult<GraphQlResponse> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        GraphQlResponse::from_http(status, &body)
    }
}

/// Multipart uploader over `reqwest`
pub struct HttpUploader {
    client: Client,
    endpoint: Url,
}

impl HttpUploader {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait(?Send)]
impl FileUploader for HttpUploader {
    type File = UploadFile;

    async fn upload(&self, file: &UploadFile) -> ClientResult<String> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ClientError::Upload(e.to_string()))?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::debug!(file = %file.name, size = file.bytes.len(), "Uploading file");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        parse_upload_response(status, &body)
    }
}
