//! Async job runner
//!
//! Submits a job to the remote service, waits for it to reach a terminal
//! state and fetches its result artifact. The three steps are strictly
//! sequential; a result is never read before the job reports success.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use docjob_core::{
    ArtifactPath, JobHandle, JobRequest, JobState, PlaceholderLayout, ResultArtifact, ResultLayout,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backoff::Backoff;
use crate::clock::{Clock, TokioClock};
use crate::config::RunnerConfig;
use crate::error::{Result, RunnerError, SubmissionFailure};
use crate::repository::{ContentStore, JobService};

/// Callback invoked after every state poll
///
/// Purely informational; it cannot influence the wait.
pub trait PollObserver: Send + Sync {
    fn on_poll(&self, attempt: u32, state: JobState);
}

impl<F> PollObserver for F
where
    F: Fn(u32, JobState) + Send + Sync,
{
    fn on_poll(&self, attempt: u32, state: JobState) {
        self(attempt, state)
    }
}

/// How `await_completion` waits
#[derive(Clone)]
pub struct WaitOptions {
    /// States that end the wait; inherently terminal states always do
    pub terminal_states: HashSet<JobState>,
    pub backoff: Backoff,
    /// Deadline measured from the start of the wait
    pub timeout: Duration,
    pub observer: Option<Arc<dyn PollObserver>>,
}

impl WaitOptions {
    /// Waits for any terminal state
    pub fn new(backoff: Backoff, timeout: Duration) -> Self {
        Self {
            terminal_states: JobState::TERMINAL.into_iter().collect(),
            backoff,
            timeout,
            observer: None,
        }
    }

    pub fn with_terminal_states(mut self, states: impl IntoIterator<Item = JobState>) -> Self {
        self.terminal_states = states.into_iter().collect();
        self
    }

    pub fn with_observer(mut self, observer: impl PollObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    fn stops_at(&self, state: JobState) -> bool {
        state.is_terminal() || self.terminal_states.contains(&state)
    }
}

impl std::fmt::Debug for WaitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitOptions")
            .field("terminal_states", &self.terminal_states)
            .field("backoff", &self.backoff)
            .field("timeout", &self.timeout)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

/// Submits jobs, waits for them and fetches their results
///
/// Cheap to clone; clones share the same collaborators.
#[derive(Clone)]
pub struct AsyncJobRunner {
    jobs: Arc<dyn JobService>,
    store: Arc<dyn ContentStore>,
    clock: Arc<dyn Clock>,
    layout: Arc<dyn ResultLayout>,
    config: RunnerConfig,
}

impl AsyncJobRunner {
    /// Creates a runner on the tokio clock with the placeholder result layout
    pub fn new(
        jobs: Arc<dyn JobService>,
        store: Arc<dyn ContentStore>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            jobs,
            store,
            clock: Arc::new(TokioClock),
            layout: Arc::new(PlaceholderLayout),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_layout(mut self, layout: Arc<dyn ResultLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Creates one remote job for `request`
    ///
    /// The request is validated first; nothing is sent if it is invalid.
    pub async fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        request.validate()?;

        let handle = self
            .jobs
            .create(request)
            .await
            .map_err(|e| RunnerError::Submission(SubmissionFailure::Rejected(e)))?;

        info!(
            "Submitted job {} ('{}')",
            handle.id(),
            request.display_name()
        );

        if handle.state().is_terminal() {
            debug!(
                "Job {} reported {} on creation, resetting to Submitted",
                handle.id(),
                handle.state()
            );
            return Ok(handle.with_state(JobState::Submitted));
        }

        Ok(handle)
    }

    /// Default wait options derived from the runner configuration
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new(self.config.backoff(), self.config.job_timeout)
    }

    /// Polls the job until it stops, fails, times out or is cancelled
    ///
    /// The first poll happens immediately. Both the sleeps and the poll
    /// requests themselves are bounded by the deadline, so a timeout is
    /// reported at most one poll interval after it passes. A timeout too
    /// large to represent as an instant means no deadline.
    pub async fn await_completion(
        &self,
        mut handle: JobHandle,
        options: &WaitOptions,
        cancel: &CancellationToken,
    ) -> Result<JobHandle> {
        let job_id = handle.id().clone();
        let started = self.clock.now();
        let deadline = started.checked_add(options.timeout);
        let mut attempt: u32 = 0;

        debug!("Waiting for job {} ({:?})", job_id, options);

        loop {
            let remaining = deadline.map(|d| d.saturating_duration_since(self.clock.now()));

            let state = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Stopped waiting for job {}: cancelled", job_id);
                    return Err(RunnerError::Cancelled { job_id: job_id.clone() });
                }
                result = self.jobs.get_state(&job_id) => {
                    result.map_err(|source| RunnerError::Poll {
                        job_id: job_id.clone(),
                        source,
                    })?
                }
                _ = self.sleep_for(remaining) => {
                    warn!("Job {} poll still pending at the deadline", job_id);
                    return Err(RunnerError::Timeout {
                        job_id: job_id.clone(),
                        last_state: handle.state(),
                        elapsed: self.clock.now().saturating_duration_since(started),
                    });
                }
            };

            attempt = attempt.saturating_add(1);
            handle = handle.with_state(state);
            debug!("Job {} poll #{}: {}", job_id, attempt, state);

            if let Some(observer) = &options.observer {
                observer.on_poll(attempt, state);
            }

            if state.is_failure() {
                warn!("Job {} ended in state {}", job_id, state);
                return Err(RunnerError::JobFailed { job_id, state });
            }

            if options.stops_at(state) {
                info!(
                    "Job {} reached {} after {} poll(s)",
                    job_id, state, attempt
                );
                return Ok(handle);
            }

            let now = self.clock.now();
            let mut delay = options.backoff.delay(attempt);
            if let Some(deadline) = deadline {
                if now >= deadline {
                    return Err(RunnerError::Timeout {
                        job_id,
                        last_state: state,
                        elapsed: now - started,
                    });
                }
                delay = delay.min(deadline - now);
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Stopped waiting for job {}: cancelled", job_id);
                    return Err(RunnerError::Cancelled { job_id: job_id.clone() });
                }
                _ = self.clock.sleep(delay) => {}
            }
        }
    }

    /// Sleeps for `duration` on the runner's clock, or forever when unset
    async fn sleep_for(&self, duration: Option<Duration>) {
        match duration {
            Some(duration) => self.clock.sleep(duration).await,
            None => std::future::pending().await,
        }
    }

    /// Path of the job's result under the runner's layout
    pub fn result_path(&self, handle: &JobHandle) -> ArtifactPath {
        self.layout
            .artifact_path(handle.id(), handle.output(), handle.input())
    }

    /// Reads the result artifact of a succeeded job
    pub async fn fetch_result(
        &self,
        handle: &JobHandle,
        path: &ArtifactPath,
    ) -> Result<ResultArtifact> {
        if !handle.state().is_success() {
            return Err(RunnerError::Precondition {
                job_id: handle.id().clone(),
                state: handle.state(),
            });
        }

        debug!("Fetching result of job {} from {}", handle.id(), path);

        match self.store.get(path).await {
            Ok(content) => Ok(ResultArtifact::new(path.clone(), content)),
            Err(e) if e.is_not_found() => Err(RunnerError::NotFound { path: path.clone() }),
            Err(source) => Err(RunnerError::Fetch {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Full workflow: submit, wait with the default options, fetch
    pub async fn run(
        &self,
        request: &JobRequest,
        cancel: &CancellationToken,
    ) -> Result<ResultArtifact> {
        let handle = self.submit(request).await?;
        let handle = self
            .await_completion(handle, &self.wait_options(), cancel)
            .await?;
        let path = self.result_path(&handle);
        self.fetch_result(&handle, &path).await
    }
}
