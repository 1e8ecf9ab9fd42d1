//! Job request domain types
//!
//! A `JobRequest` names the work target (compartment), where the document
//! comes from, where results go and which processor features to run.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a request is rejected before it is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("work target (compartment id) must not be empty")]
    EmptyTarget,

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("at least one processor feature is required")]
    NoFeatures,

    #[error("input location lists no documents")]
    NoInputDocuments,

    #[error("input object {index} is missing its {field}")]
    IncompleteObject { index: usize, field: &'static str },

    #[error("inline document content is empty")]
    EmptyInlineContent,

    #[error("inline document content is not valid base64: {0}")]
    InvalidInlineContent(String),

    #[error("output location is missing its {0}")]
    IncompleteOutput(&'static str),
}

/// A document stored in the object store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLocation {
    #[serde(rename = "namespaceName")]
    pub namespace: String,
    #[serde(rename = "bucketName")]
    pub bucket: String,
    pub object_name: String,
}

impl ObjectLocation {
    pub fn new(
        namespace: impl Into<String>,
        bucket: impl Into<String>,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            bucket: bucket.into(),
            object_name: object_name.into(),
        }
    }
}

/// Where the service reads the document from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType")]
pub enum InputLocation {
    /// One or more documents already uploaded to the object store
    #[serde(rename = "OBJECT_STORAGE_LOCATIONS")]
    ObjectStorage {
        #[serde(rename = "objectLocations")]
        objects: Vec<ObjectLocation>,
    },
    /// Base64-encoded document sent with the request
    #[serde(rename = "INLINE_DOCUMENT_CONTENT")]
    Inline { data: String },
}

impl InputLocation {
    /// Single object-store document
    pub fn object(location: ObjectLocation) -> Self {
        Self::ObjectStorage {
            objects: vec![location],
        }
    }

    /// Encodes raw document bytes for inline submission
    pub fn inline_bytes(bytes: &[u8]) -> Self {
        Self::Inline {
            data: STANDARD.encode(bytes),
        }
    }

    /// First object-store document, if any
    pub fn first_object(&self) -> Option<&ObjectLocation> {
        match self {
            InputLocation::ObjectStorage { objects } => objects.first(),
            InputLocation::Inline { .. } => None,
        }
    }

    fn validate(&self) -> Result<(), RequestError> {
        match self {
            InputLocation::ObjectStorage { objects } => {
                if objects.is_empty() {
                    return Err(RequestError::NoInputDocuments);
                }
                for (index, object) in objects.iter().enumerate() {
                    let missing = if object.namespace.trim().is_empty() {
                        Some("namespace")
                    } else if object.bucket.trim().is_empty() {
                        Some("bucket")
                    } else if object.object_name.trim().is_empty() {
                        Some("object name")
                    } else {
                        None
                    };
                    if let Some(field) = missing {
                        return Err(RequestError::IncompleteObject { index, field });
                    }
                }
                Ok(())
            }
            InputLocation::Inline { data } => {
                if data.is_empty() {
                    return Err(RequestError::EmptyInlineContent);
                }
                STANDARD
                    .decode(data)
                    .map_err(|e| RequestError::InvalidInlineContent(e.to_string()))?;
                Ok(())
            }
        }
    }
}

/// Where the service writes job results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLocation {
    #[serde(rename = "namespaceName")]
    pub namespace: String,
    #[serde(rename = "bucketName")]
    pub bucket: String,
    pub prefix: String,
}

impl OutputLocation {
    pub fn new(
        namespace: impl Into<String>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

/// Processor feature to run against the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "featureType")]
pub enum Feature {
    #[serde(rename = "DOCUMENT_CLASSIFICATION")]
    DocumentClassification {
        #[serde(
            rename = "maxResults",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        max_results: Option<u32>,
    },
    #[serde(rename = "TABLE_EXTRACTION")]
    TableExtraction,
    #[serde(rename = "TEXT_EXTRACTION")]
    TextExtraction {
        #[serde(rename = "generateSearchablePdf", default)]
        generate_searchable_pdf: bool,
    },
    #[serde(rename = "KEY_VALUE_EXTRACTION")]
    KeyValueExtraction,
    #[serde(rename = "LANGUAGE_CLASSIFICATION")]
    LanguageClassification {
        #[serde(
            rename = "maxResults",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        max_results: Option<u32>,
    },
}

impl Feature {
    pub fn document_classification() -> Self {
        Self::DocumentClassification { max_results: None }
    }

    pub fn table_extraction() -> Self {
        Self::TableExtraction
    }
}

/// Parameters describing a unit of work to submit
///
/// Immutable once built; consumed by a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    compartment_id: String,
    display_name: String,
    input: InputLocation,
    output: OutputLocation,
    features: Vec<Feature>,
}

impl JobRequest {
    /// Creates a request with a random display name and no features
    pub fn new(
        compartment_id: impl Into<String>,
        input: InputLocation,
        output: OutputLocation,
    ) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            display_name: uuid::Uuid::new_v4().to_string(),
            input,
            output,
            features: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn compartment_id(&self) -> &str {
        &self.compartment_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn input(&self) -> &InputLocation {
        &self.input
    }

    pub fn output(&self) -> &OutputLocation {
        &self.output
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Checks everything that can be checked without asking the service
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.compartment_id.trim().is_empty() {
            return Err(RequestError::EmptyTarget);
        }
        if self.display_name.trim().is_empty() {
            return Err(RequestError::EmptyDisplayName);
        }
        if self.features.is_empty() {
            return Err(RequestError::NoFeatures);
        }
        self.input.validate()?;
        if self.output.namespace.trim().is_empty() {
            return Err(RequestError::IncompleteOutput("namespace"));
        }
        if self.output.bucket.trim().is_empty() {
            return Err(RequestError::IncompleteOutput("bucket"));
        }
        Ok(())
    }
}
