//! Test doubles shared by the runner's unit tests

use async_trait::async_trait;
use docjob_client::{ClientError, Result};
use docjob_core::{
    Feature, InputLocation, JobHandle, JobId, JobRequest, JobState, ObjectLocation, OutputLocation,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::repository::JobService;

/// Job service that replays a fixed sequence of states
///
/// Each poll consumes the next scripted state; once the script runs out
/// the last state repeats forever.
pub struct ScriptedJobService {
    job_id: JobId,
    script: Mutex<VecDeque<JobState>>,
    last: Mutex<JobState>,
    create_error: Mutex<Option<ClientError>>,
    poll_error_at: Option<u32>,
    creates: AtomicU32,
    polls: AtomicU32,
    cancels: AtomicU32,
}

impl ScriptedJobService {
    pub fn new(job_id: &str, states: impl IntoIterator<Item = JobState>) -> Self {
        Self {
            job_id: JobId::new(job_id),
            script: Mutex::new(states.into_iter().collect()),
            last: Mutex::new(JobState::Submitted),
            create_error: Mutex::new(None),
            poll_error_at: None,
            creates: AtomicU32::new(0),
            polls: AtomicU32::new(0),
            cancels: AtomicU32::new(0),
        }
    }

    /// Reports `InProgress` for `n - 1` polls, then `Succeeded`
    pub fn succeeding_after(job_id: &str, n: u32) -> Self {
        let mut states: Vec<JobState> = (1..n).map(|_| JobState::InProgress).collect();
        states.push(JobState::Succeeded);
        Self::new(job_id, states)
    }

    /// Never leaves `InProgress`
    pub fn never_finishing(job_id: &str) -> Self {
        Self::new(job_id, [JobState::InProgress])
    }

    pub fn rejecting_create(self, err: ClientError) -> Self {
        *self.create_error.lock().unwrap() = Some(err);
        self
    }

    /// Fails poll number `attempt` (1-based)
    pub fn failing_poll(mut self, attempt: u32) -> Self {
        self.poll_error_at = Some(attempt);
        self
    }

    pub fn creates(&self) -> u32 {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> u32 {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobService for ScriptedJobService {
    async fn create(&self, request: &JobRequest) -> Result<JobHandle> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(JobHandle::submitted(
            self.job_id.clone(),
            request.input().clone(),
            request.output().clone(),
        ))
    }

    async fn get_state(&self, job_id: &JobId) -> Result<JobState> {
        assert_eq!(job_id, &self.job_id, "polled an unknown job");
        let attempt = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.poll_error_at == Some(attempt) {
            return Err(ClientError::api_error(503, "service unavailable"));
        }
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(*last)
    }

    async fn cancel(&self, _job_id: &JobId) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Job service whose state requests never answer
pub struct HangingJobService {
    polls: AtomicU32,
}

impl HangingJobService {
    pub fn new() -> Self {
        Self {
            polls: AtomicU32::new(0),
        }
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobService for HangingJobService {
    async fn create(&self, request: &JobRequest) -> Result<JobHandle> {
        Ok(JobHandle::submitted(
            JobId::new("job-stalled"),
            request.input().clone(),
            request.output().clone(),
        ))
    }

    async fn get_state(&self, _job_id: &JobId) -> Result<JobState> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn cancel(&self, _job_id: &JobId) -> Result<()> {
        Ok(())
    }
}

/// Job service running many independent scripted jobs
///
/// Each job's id is the display name of the request that created it.
/// Tracks how many jobs were created but not yet seen in a terminal state.
pub struct FleetJobService {
    scripts: Mutex<HashMap<String, VecDeque<JobState>>>,
    finished: Mutex<HashSet<JobId>>,
    creates: AtomicU32,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FleetJobService {
    pub fn new<'a>(jobs: impl IntoIterator<Item = (&'a str, Vec<JobState>)>) -> Self {
        Self {
            scripts: Mutex::new(
                jobs.into_iter()
                    .map(|(name, states)| (name.to_string(), states.into()))
                    .collect(),
            ),
            finished: Mutex::new(HashSet::new()),
            creates: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn creates(&self) -> u32 {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobService for FleetJobService {
    async fn create(&self, request: &JobRequest) -> Result<JobHandle> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Ok(JobHandle::submitted(
            JobId::new(request.display_name()),
            request.input().clone(),
            request.output().clone(),
        ))
    }

    async fn get_state(&self, job_id: &JobId) -> Result<JobState> {
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts
            .get_mut(job_id.as_str())
            .ok_or_else(|| ClientError::NotFound(job_id.to_string()))?;
        let state = if script.len() > 1 {
            script.pop_front().unwrap_or(JobState::InProgress)
        } else {
            script.front().copied().unwrap_or(JobState::InProgress)
        };
        if state.is_terminal() && self.finished.lock().unwrap().insert(job_id.clone()) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(state)
    }

    async fn cancel(&self, _job_id: &JobId) -> Result<()> {
        Ok(())
    }
}

/// Valid request for a single object-store document
pub fn request_for(object_name: &str, prefix: &str) -> JobRequest {
    JobRequest::new(
        "ocid1.compartment.test",
        InputLocation::object(ObjectLocation::new("inns", "docs", object_name)),
        OutputLocation::new("outns", "results", prefix),
    )
    .with_feature(Feature::document_classification())
}
