//! Processor job API endpoints

use crate::error::Result;
use crate::{DocumentClient, handle_empty_response, handle_response};
use docjob_core::domain::job::JobId;
use docjob_core::domain::request::JobRequest;
use docjob_core::dto::job::{CreateProcessorJobDetails, ProcessorJob};
use tracing::debug;

/// API version segment of every document service path
pub const API_VERSION: &str = "20221109";

impl DocumentClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Create a processor job
    ///
    /// # Arguments
    /// * `req` - The job request
    ///
    /// # Returns
    /// The job record as accepted by the service
    pub async fn create_processor_job(&self, req: &JobRequest) -> Result<ProcessorJob> {
        let url = format!("{}/{}/processorJobs", self.base_url, API_VERSION);
        let body = CreateProcessorJobDetails::from(req);
        debug!("Creating processor job '{}'", body.display_name);

        let response = self.authorize(self.client.post(&url)).json(&body).send().await?;

        handle_response(response, &format!("processor job '{}'", body.display_name)).await
    }

    /// Get a processor job by ID
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    ///
    /// # Returns
    /// The job record including its current lifecycle state
    pub async fn get_processor_job(&self, job_id: &JobId) -> Result<ProcessorJob> {
        let url = format!("{}/{}/processorJobs/{}", self.base_url, API_VERSION, job_id);
        let response = self.authorize(self.client.get(&url)).send().await?;

        handle_response(response, &format!("processor job {}", job_id)).await
    }

    /// Request cancellation of a processor job
    ///
    /// The service moves the job through `CANCELING` to `CANCELED`; this
    /// call returns as soon as the request is accepted.
    pub async fn cancel_processor_job(&self, job_id: &JobId) -> Result<()> {
        let url = format!(
            "{}/{}/processorJobs/{}/actions/cancel",
            self.base_url, API_VERSION, job_id
        );
        let response = self.authorize(self.client.post(&url)).send().await?;

        handle_empty_response(response, &format!("processor job {}", job_id)).await
    }
}
