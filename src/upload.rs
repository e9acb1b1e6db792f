//! File upload endpoint
//!
//! Phase one of an upload: the raw bytes go to a plain multipart endpoint
//! (not GraphQL) which answers with the server-assigned path.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Same-origin path of the upload endpoint
pub const UPLOAD_PATH: &str = "/upload";

/// Multipart field carrying the file
pub const UPLOAD_FIELD: &str = "file";

/// Sends a file to the upload endpoint and returns its server path
#[async_trait(?Send)]
pub trait FileUploader {
    /// The platform's file handle (bytes on disk, a browser `File`, ...)
    type File;

    async fn upload(&self, file: &Self::File) -> ClientResult<String>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "filePath")]
    file_path: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Interpret the upload endpoint's reply
pub fn parse_upload_response(status: u16, body: &str) -> ClientResult<String> {
    let parsed = serde_json::from_str::<UploadResponse>(body);

    if !(200..300).contains(&status) {
        let detail = parsed
            .ok()
            .and_then(|r| r.message)
            .unwrap_or_else(|| format!("status {}", status));
        return Err(ClientError::Upload(detail));
    }

    let response = parsed.map_err(|e| ClientError::Upload(format!("invalid response: {}", e)))?;

    response
        .file_path
        .filter(|path| !path.is_empty())
        .ok_or_else(|| ClientError::Upload("response has no filePath".to_string()))
}

/// A file read into memory for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).map(str::to_string);
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk
    #[cfg(feature = "native")]
    pub async fn read(path: &std::path::Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Upload(format!("cannot read {:?}: {}", path, e)))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(name, bytes))
    }
}

/// Content type for the media formats the API accepts
fn content_type_for(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();

    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        _ => return None,
    })
}
