//! Result artifact types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Address of an object in the content store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactPath {
    pub namespace: String,
    pub bucket: String,
    pub object_name: String,
}

impl ArtifactPath {
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

impl std::fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.bucket, self.object_name)
    }
}

/// Output of a successfully completed job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    path: ArtifactPath,
    content: Bytes,
}

impl ResultArtifact {
    pub fn new(path: ArtifactPath, content: impl Into<Bytes>) -> Self {
        Self {
            path,
            content: content.into(),
        }
    }

    pub fn path(&self) -> &ArtifactPath {
        &self.path
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn into_bytes(self) -> Bytes {
        self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content as UTF-8 text
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.content)
    }

    /// Content parsed as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = ArtifactPath::new("ns", "bucket", "out/job/_/results/doc.json");
        assert_eq!(path.to_string(), "ns/bucket/out/job/_/results/doc.json");
    }

    #[test]
    fn test_artifact_views() {
        let artifact = ResultArtifact::new(
            ArtifactPath::new("ns", "b", "o.json"),
            Bytes::from_static(br#"{"pages":1}"#),
        );
        assert_eq!(artifact.len(), 11);
        assert_eq!(artifact.text().unwrap(), r#"{"pages":1}"#);
        let value: serde_json::Value = artifact.json().unwrap();
        assert_eq!(value["pages"], 1);
    }
}
