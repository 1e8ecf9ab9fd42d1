//! Object store client
//!
//! Reads result artifacts written by the document service.

use bytes::Bytes;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{ClientConfig, authorize, check_status};
use docjob_core::domain::artifact::ArtifactPath;

/// HTTP client for the object store API
#[derive(Debug, Clone)]
pub struct ObjectStorageClient {
    base_url: String,
    client: Client,
    auth_token: Option<String>,
}

impl ObjectStorageClient {
    /// Create a new object store client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the object store API
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
        }
    }

    /// Create a client from connection settings
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "object storage endpoint is empty".to_string(),
            ));
        }
        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            client: config.build_http_client()?,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Get the base URL of the object store
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of an object
    ///
    /// The object name is sent as a single path segment, so any `/` in it
    /// is percent-encoded.
    pub fn object_url(&self, path: &ArtifactPath) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("bad object store URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "object store URL cannot have a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "n",
                path.namespace.as_str(),
                "b",
                path.bucket.as_str(),
                "o",
                path.object_name.as_str(),
            ]);
        Ok(url)
    }

    /// Fetch an object's content
    ///
    /// # Returns
    /// The raw bytes, or `ClientError::NotFound` if no object exists at `path`
    pub async fn get_object(&self, path: &ArtifactPath) -> Result<Bytes> {
        let url = self.object_url(path)?;
        debug!("Fetching object {}", path);

        let response = authorize(self.client.get(url), self.auth_token.as_deref())
            .send()
            .await?;
        let response = check_status(response, &format!("object {}", path)).await?;

        Ok(response.bytes().await?)
    }
}
