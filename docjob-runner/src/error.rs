//! Error types for the job workflow

use std::time::Duration;

use docjob_client::ClientError;
use docjob_core::{ArtifactPath, JobId, JobState, RequestError};
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Why a submission never produced a job
#[derive(Debug, Error)]
pub enum SubmissionFailure {
    /// The request failed local validation
    #[error(transparent)]
    Invalid(#[from] RequestError),

    /// The service rejected the request
    #[error(transparent)]
    Rejected(#[from] ClientError),
}

/// Errors surfaced by the submit / poll / fetch workflow
///
/// Every failure aborts the workflow for one job only.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Request rejected before a job exists
    #[error("job submission failed: {0}")]
    Submission(#[source] SubmissionFailure),

    /// Reading the job state failed
    #[error("polling job {job_id} failed: {source}")]
    Poll {
        job_id: JobId,
        #[source]
        source: ClientError,
    },

    /// The deadline passed before the job reached a terminal state
    #[error("job {job_id} still {last_state} after {elapsed:?}")]
    Timeout {
        job_id: JobId,
        last_state: JobState,
        elapsed: Duration,
    },

    /// The job ended without success
    #[error("job {job_id} ended in state {state}")]
    JobFailed { job_id: JobId, state: JobState },

    /// The caller cancelled the wait
    #[error("waiting for job {job_id} was cancelled")]
    Cancelled { job_id: JobId },

    /// A result was requested for a job that has not succeeded
    #[error("cannot fetch result of job {job_id} in state {state}")]
    Precondition { job_id: JobId, state: JobState },

    /// No artifact exists at the derived path
    #[error("no result artifact at {path}")]
    NotFound { path: ArtifactPath },

    /// The content store failed for another reason
    #[error("fetching {path} failed: {source}")]
    Fetch {
        path: ArtifactPath,
        #[source]
        source: ClientError,
    },
}

impl RunnerError {
    /// Job the error refers to, when one exists
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            RunnerError::Poll { job_id, .. }
            | RunnerError::Timeout { job_id, .. }
            | RunnerError::JobFailed { job_id, .. }
            | RunnerError::Cancelled { job_id }
            | RunnerError::Precondition { job_id, .. } => Some(job_id),
            RunnerError::Submission(_) | RunnerError::NotFound { .. } | RunnerError::Fetch { .. } => {
                None
            }
        }
    }
}

impl From<RequestError> for RunnerError {
    fn from(err: RequestError) -> Self {
        RunnerError::Submission(SubmissionFailure::Invalid(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RunnerError::JobFailed {
            job_id: JobId::new("j1"),
            state: JobState::Failed,
        };
        assert_eq!(err.to_string(), "job j1 ended in state Failed");
        assert_eq!(err.job_id(), Some(&JobId::new("j1")));

        let err = RunnerError::from(RequestError::NoFeatures);
        assert!(err.to_string().contains("at least one processor feature"));
        assert!(err.job_id().is_none());
    }
}
