//! Jobs repository
//!
//! Handles communication with the document service for job operations:
//! - Creating jobs from requests
//! - Reading the current lifecycle state
//! - Requesting cancellation

use async_trait::async_trait;
use docjob_client::{DocumentClient, Result};
use docjob_core::{JobHandle, JobId, JobRequest, JobState};
use tracing::debug;

/// Repository trait for the remote job service
#[async_trait]
pub trait JobService: Send + Sync {
    /// Creates a remote job
    ///
    /// Returns a handle in the initial `Submitted` state.
    async fn create(&self, request: &JobRequest) -> Result<JobHandle>;

    /// Reads the current lifecycle state of a job
    async fn get_state(&self, job_id: &JobId) -> Result<JobState>;

    /// Asks the service to cancel a job
    async fn cancel(&self, job_id: &JobId) -> Result<()>;
}

/// HTTP implementation of JobService
#[derive(Debug, Clone)]
pub struct HttpJobService {
    client: DocumentClient,
}

impl HttpJobService {
    /// Creates a new HTTP job service
    ///
    /// # Arguments
    /// * `client` - Configured document service client
    pub fn new(client: DocumentClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn create(&self, request: &JobRequest) -> Result<JobHandle> {
        let job = self.client.create_processor_job(request).await?;
        debug!(
            "Service accepted job {} in state {}",
            job.id, job.lifecycle_state
        );
        Ok(job.into_handle(request))
    }

    async fn get_state(&self, job_id: &JobId) -> Result<JobState> {
        let job = self.client.get_processor_job(job_id).await?;
        Ok(job.lifecycle_state)
    }

    async fn cancel(&self, job_id: &JobId) -> Result<()> {
        self.client.cancel_processor_job(job_id).await
    }
}
