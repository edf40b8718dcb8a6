//! Upload of finished documents to the remote document store.
//!
//! The store speaks a simple protocol: one authenticated `PUT` per file to
//! `<base-url>/<file name>`, carrying a multipart form whose only part is the
//! file under the field name `file`.

use std::path::Path;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

use crate::error::UploadError;
use crate::sanitize;

/// Multipart field name carrying the document.
pub const FORM_FIELD: &str = "file";

/// Outcome of one upload attempt.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: StatusCode,
    /// Response body, only read for non-2xx responses.
    pub body: Option<String>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Pushes one file to the remote store.
///
/// Implemented by [`UploadClient`] for real uploads; tests substitute
/// recording stubs.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &Path) -> Result<UploadResponse, UploadError>;
}

pub struct UploadClient {
    client: Client,
    base_url: String,
    user: String,
    password: SecretString,
}

impl UploadClient {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self::with_client(Client::new(), base_url, user, password)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        user: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            user: user.into(),
            password,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the target URL for a file name: the base URL with the file
    /// name appended as one more (percent-encoded) path segment.
    pub fn target_url(&self, file_name: &str) -> Result<Url, UploadError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            UploadError::InvalidUrl(format!("{}: {}", sanitize::redact_url(&self.base_url), e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                UploadError::InvalidUrl(format!(
                    "{} cannot be a base URL",
                    sanitize::redact_url(&self.base_url)
                ))
            })?
            .pop_if_empty()
            .push(file_name);

        Ok(url)
    }
}

#[async_trait]
impl Uploader for UploadClient {
    async fn upload(&self, file: &Path) -> Result<UploadResponse, UploadError> {
        let file_name = file
            .file_name()
            .ok_or_else(|| UploadError::MissingFileName(file.to_path_buf()))?
            .to_string_lossy()
            .into_owned();

        let url = self.target_url(&file_name)?;

        let content = tokio::fs::read(file)
            .await
            .map_err(|e| UploadError::ReadFile {
                path: file.to_path_buf(),
                source: e,
            })?;

        let mime = mime_guess::from_path(file).first_or_octet_stream();
        debug!(
            "Uploading {} ({} bytes, {})",
            file_name,
            content.len(),
            mime.essence_str()
        );

        let part = Part::bytes(content)
            .file_name(file_name.clone())
            .mime_str(mime.essence_str())?;
        let form = Form::new().part(FORM_FIELD, part);

        let response = self
            .client
            .put(url)
            .basic_auth(&self.user, Some(self.password.expose_secret()))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        info!("Upload result for {}: {}", file_name, status);

        if status.is_success() {
            return Ok(UploadResponse { status, body: None });
        }

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read response body for {}: {}", file_name, e);
                String::new()
            }
        };

        Ok(UploadResponse {
            status,
            body: Some(body),
        })
    }
}
