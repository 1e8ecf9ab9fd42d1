//! Job domain types

use serde::{Deserialize, Serialize};

use crate::domain::request::{InputLocation, OutputLocation};

/// Opaque identifier assigned to a job by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle state of a remote job
///
/// Wire names follow the service's SCREAMING_SNAKE_CASE convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    #[serde(rename = "ACCEPTED")]
    Submitted,
    InProgress,
    #[serde(rename = "CANCELING")]
    Cancelling,
    Succeeded,
    Failed,
    #[serde(rename = "CANCELED")]
    Cancelled,
}

impl JobState {
    /// States after which the job never transitions again
    pub const TERMINAL: [JobState; 3] = [JobState::Succeeded, JobState::Failed, JobState::Cancelled];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    /// Only a succeeded job has a result artifact to fetch.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Terminal states that end the workflow without a result.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Submitted => write!(f, "Submitted"),
            JobState::InProgress => write!(f, "InProgress"),
            JobState::Cancelling => write!(f, "Cancelling"),
            JobState::Succeeded => write!(f, "Succeeded"),
            JobState::Failed => write!(f, "Failed"),
            JobState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Reference to a submitted remote job
///
/// Carries the last state observed by the runner together with the
/// locations needed to derive the result path once the job succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobHandle {
    id: JobId,
    state: JobState,
    output: OutputLocation,
    input: InputLocation,
}

impl JobHandle {
    /// Creates a handle for a freshly submitted job
    pub fn submitted(id: JobId, input: InputLocation, output: OutputLocation) -> Self {
        Self {
            id,
            state: JobState::Submitted,
            output,
            input,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Last observed state
    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn output(&self) -> &OutputLocation {
        &self.output
    }

    pub fn input(&self) -> &InputLocation {
        &self.input
    }

    /// Returns the same handle with a newly observed state
    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = state;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Submitted.is_terminal());
        assert!(!JobState::InProgress.is_terminal());
        assert!(!JobState::Cancelling.is_terminal());
        for state in JobState::TERMINAL {
            assert!(state.is_terminal());
        }
        assert!(JobState::Succeeded.is_success());
        assert!(!JobState::Succeeded.is_failure());
        assert!(JobState::Cancelled.is_failure());
    }

    #[test]
    fn test_state_wire_names() {
        let state: JobState = serde_json::from_str("\"ACCEPTED\"").unwrap();
        assert_eq!(state, JobState::Submitted);
        let state: JobState = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(state, JobState::InProgress);
        let state: JobState = serde_json::from_str("\"CANCELED\"").unwrap();
        assert_eq!(state, JobState::Cancelled);
        assert_eq!(
            serde_json::to_string(&JobState::Succeeded).unwrap(),
            "\"SUCCEEDED\""
        );
    }

    #[test]
    fn test_handle_starts_submitted() {
        let handle = JobHandle::submitted(
            JobId::new("job-1"),
            InputLocation::inline_bytes(b"%PDF"),
            OutputLocation::new("ns", "bucket", "out"),
        );
        assert_eq!(handle.state(), JobState::Submitted);
        assert_eq!(handle.id().as_str(), "job-1");

        let handle = handle.with_state(JobState::Succeeded);
        assert_eq!(handle.state(), JobState::Succeeded);
    }
}
