//! Docjob HTTP Client
//!
//! Type-safe HTTP clients for the two remote collaborators of a document
//! job: the document service that runs processor jobs, and the object
//! store that holds their results.
//!
//! # Example
//!
//! ```no_run
//! use docjob_client::DocumentClient;
//! use docjob_core::{Feature, InputLocation, JobRequest, ObjectLocation, OutputLocation};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DocumentClient::new("http://localhost:8080");
//!
//!     let request = JobRequest::new(
//!         "ocid1.compartment.example",
//!         InputLocation::object(ObjectLocation::new("ns", "docs", "invoice.pdf")),
//!         OutputLocation::new("ns", "results", "demo"),
//!     )
//!     .with_feature(Feature::document_classification());
//!
//!     let job = client.create_processor_job(&request).await?;
//!     println!("Created job: {}", job.id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod objects;

pub use error::{ClientError, Result};
pub use objects::ObjectStorageClient;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connection settings shared by both clients
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL of the service (e.g., "https://document.example.com")
    pub endpoint: String,
    /// Bearer token sent with every request, if set
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the reqwest client described by this config
    fn build_http_client(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

/// HTTP client for the document service API
///
/// Covers the processor job lifecycle: create, get and cancel.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    /// Base URL of the service (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
    auth_token: Option<String>,
}

impl DocumentClient {
    /// Create a new document service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use docjob_client::DocumentClient;
    ///
    /// let client = DocumentClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
        }
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth_token: None,
        }
    }

    /// Create a client from connection settings
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "document service endpoint is empty".to_string(),
            ));
        }
        let mut client = Self::with_client(&config.endpoint, config.build_http_client()?);
        client.auth_token = config.auth_token.clone();
        Ok(client)
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        authorize(request, self.auth_token.as_deref())
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

pub(crate) fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Turns a non-success response into the matching error
///
/// 404 becomes `NotFound` so callers can tell a missing resource apart
/// from other API failures.
pub(crate) async fn check_status(
    response: reqwest::Response,
    resource: &str,
) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(resource.to_string()));
    }

    Err(ClientError::api_error(status.as_u16(), error_text))
}

/// Handle an API response and deserialize JSON
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    resource: &str,
) -> Result<T> {
    check_status(response, resource)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Handle an API response that returns no content
pub(crate) async fn handle_empty_response(
    response: reqwest::Response,
    resource: &str,
) -> Result<()> {
    check_status(response, resource).await?;
    Ok(())
}
