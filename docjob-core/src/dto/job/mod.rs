//! Job DTOs exchanged with the document service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::{JobHandle, JobId, JobState};
use crate::domain::request::{Feature, InputLocation, JobRequest, OutputLocation};

/// Processor configuration attached to a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    pub processor_type: String,
    pub features: Vec<Feature>,
}

impl ProcessorConfig {
    /// General-purpose processor running the given features
    pub fn general(features: Vec<Feature>) -> Self {
        Self {
            processor_type: "GENERAL".to_string(),
            features,
        }
    }
}

/// Body of the create-job call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProcessorJobDetails {
    pub display_name: String,
    pub compartment_id: String,
    pub input_location: InputLocation,
    pub output_location: OutputLocation,
    pub processor_config: ProcessorConfig,
}

impl From<&JobRequest> for CreateProcessorJobDetails {
    fn from(req: &JobRequest) -> Self {
        Self {
            display_name: req.display_name().to_string(),
            compartment_id: req.compartment_id().to_string(),
            input_location: req.input().clone(),
            output_location: req.output().clone(),
            processor_config: ProcessorConfig::general(req.features().to_vec()),
        }
    }
}

/// Job record as reported by the document service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorJob {
    pub id: JobId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub compartment_id: Option<String>,
    pub lifecycle_state: JobState,
    #[serde(default)]
    pub lifecycle_details: Option<String>,
    #[serde(default)]
    pub percent_complete: Option<f32>,
    #[serde(default)]
    pub time_accepted: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_started: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_finished: Option<DateTime<Utc>>,
}

impl ProcessorJob {
    /// Handle for a job created from `req`
    ///
    /// The handle always starts as `Submitted`; whatever state the
    /// creation response reports is picked up by the first poll.
    pub fn into_handle(self, req: &JobRequest) -> JobHandle {
        JobHandle::submitted(self.id, req.input().clone(), req.output().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::ObjectLocation;

    #[test]
    fn test_create_details_from_request() {
        let req = JobRequest::new(
            "ocid1.compartment.test",
            InputLocation::object(ObjectLocation::new("ns", "docs", "doc.pdf")),
            OutputLocation::new("ns", "out", "demo"),
        )
        .with_display_name("classify-doc")
        .with_feature(Feature::document_classification());

        let details = CreateProcessorJobDetails::from(&req);
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["displayName"], "classify-doc");
        assert_eq!(json["compartmentId"], "ocid1.compartment.test");
        assert_eq!(json["outputLocation"]["prefix"], "demo");
        assert_eq!(json["processorConfig"]["processorType"], "GENERAL");
        assert_eq!(
            json["processorConfig"]["features"][0]["featureType"],
            "DOCUMENT_CLASSIFICATION"
        );
    }

    #[test]
    fn test_processor_job_parses_minimal_response() {
        let job: ProcessorJob = serde_json::from_str(
            r#"{"id":"ocid1.job.1","lifecycleState":"IN_PROGRESS","percentComplete":40.0}"#,
        )
        .unwrap();
        assert_eq!(job.id.as_str(), "ocid1.job.1");
        assert_eq!(job.lifecycle_state, JobState::InProgress);
        assert_eq!(job.percent_complete, Some(40.0));
        assert!(job.time_accepted.is_none());
    }

    #[test]
    fn test_handle_ignores_creation_state() {
        let req = JobRequest::new(
            "c",
            InputLocation::inline_bytes(b"x"),
            OutputLocation::new("ns", "b", "p"),
        )
        .with_feature(Feature::table_extraction());
        let job: ProcessorJob =
            serde_json::from_str(r#"{"id":"j","lifecycleState":"SUCCEEDED"}"#).unwrap();
        let handle = job.into_handle(&req);
        assert_eq!(handle.state(), JobState::Submitted);
        assert_eq!(handle.output(), req.output());
    }
}
