//! Batch driver
//!
//! Runs many independent workflows at once. Each request gets its own task
//! with a semaphore bounding how many are in flight; one failure never
//! affects the others.

use std::sync::Arc;

use docjob_core::{JobRequest, ResultArtifact};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::RunnerError;
use crate::service::AsyncJobRunner;

/// Result of one workflow in a batch
#[derive(Debug)]
pub enum BatchOutcome {
    /// The job succeeded and its artifact was fetched
    Completed {
        display_name: String,
        artifact: ResultArtifact,
    },
    /// The workflow failed at some step
    Failed {
        display_name: String,
        error: RunnerError,
    },
    /// Cancelled before the job was submitted
    Skipped { display_name: String },
    /// The workflow task panicked
    Panicked {
        display_name: String,
        message: String,
    },
}

impl BatchOutcome {
    pub fn display_name(&self) -> &str {
        match self {
            BatchOutcome::Completed { display_name, .. }
            | BatchOutcome::Failed { display_name, .. }
            | BatchOutcome::Skipped { display_name }
            | BatchOutcome::Panicked { display_name, .. } => display_name,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, BatchOutcome::Completed { .. })
    }
}

/// Runs every request through the full workflow
///
/// At most `max_parallel_jobs` workflows run at once. Outcomes come back
/// in the order of `requests`. Cancelling `cancel` aborts in-flight waits
/// and skips requests that have not been submitted yet.
pub async fn run_batch(
    runner: &AsyncJobRunner,
    requests: Vec<JobRequest>,
    cancel: &CancellationToken,
) -> Vec<BatchOutcome> {
    let semaphore = Arc::new(Semaphore::new(runner.config().max_parallel_jobs.max(1)));

    info!(
        "Running batch of {} job(s), up to {} at a time",
        requests.len(),
        runner.config().max_parallel_jobs
    );

    let mut handles = Vec::with_capacity(requests.len());

    for request in requests {
        let display_name = request.display_name().to_string();
        let handle = spawn_workflow(
            runner.clone(),
            request,
            Arc::clone(&semaphore),
            cancel.clone(),
        );
        handles.push((display_name, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());

    for (display_name, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                warn!("Workflow task for '{}' panicked: {}", display_name, e);
                outcomes.push(BatchOutcome::Panicked {
                    display_name,
                    message: e.to_string(),
                });
            }
        }
    }

    let completed = outcomes.iter().filter(|o| o.is_completed()).count();
    info!("Batch finished: {}/{} completed", completed, outcomes.len());

    outcomes
}

/// Spawns a task running one workflow once a permit is free
fn spawn_workflow(
    runner: AsyncJobRunner,
    request: JobRequest,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<BatchOutcome> {
    tokio::spawn(async move {
        let display_name = request.display_name().to_string();

        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = semaphore.acquire_owned() => permit.ok(),
        };

        // Permit is released when dropped at the end of the task
        let Some(_permit) = permit else {
            debug!("Skipping '{}': batch cancelled", display_name);
            return BatchOutcome::Skipped { display_name };
        };

        if cancel.is_cancelled() {
            debug!("Skipping '{}': batch cancelled", display_name);
            return BatchOutcome::Skipped { display_name };
        }

        match runner.run(&request, &cancel).await {
            Ok(artifact) => BatchOutcome::Completed {
                display_name,
                artifact,
            },
            Err(error) => {
                warn!("Workflow '{}' failed: {}", display_name, error);
                BatchOutcome::Failed {
                    display_name,
                    error,
                }
            }
        }
    })
}
