//! Result path layouts
//!
//! The service writes each job's output under the output prefix, in a
//! folder named after the job id, with a `results` subfolder. How the
//! input is named inside that folder varies between processors, so the
//! mapping is a pluggable strategy.

use crate::domain::artifact::ArtifactPath;
use crate::domain::job::JobId;
use crate::domain::request::{InputLocation, OutputLocation};

/// Object name used for documents that have no name of their own
pub const DEFAULT_OBJECT_NAME: &str = "defaultObject";

const PLACEHOLDER_SEGMENT: &str = "_";
const RESULTS_FOLDER: &str = "results";

/// Maps a job and its locations to the path of its result artifact
pub trait ResultLayout: Send + Sync {
    fn artifact_path(
        &self,
        job_id: &JobId,
        output: &OutputLocation,
        input: &InputLocation,
    ) -> ArtifactPath;
}

/// `{prefix}/{job}/{namespace}_{bucket}/results/{object}.json`
///
/// The input folder names the source namespace and bucket, and the
/// result file keeps the full object name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespacedLayout;

impl ResultLayout for NamespacedLayout {
    fn artifact_path(
        &self,
        job_id: &JobId,
        output: &OutputLocation,
        input: &InputLocation,
    ) -> ArtifactPath {
        let (folder, name) = match input.first_object() {
            Some(object) => (
                format!("{}_{}", object.namespace, object.bucket),
                object.object_name.clone(),
            ),
            None => (
                PLACEHOLDER_SEGMENT.to_string(),
                DEFAULT_OBJECT_NAME.to_string(),
            ),
        };
        build_path(output, job_id, &folder, &name)
    }
}

/// `{prefix}/{job}/_/results/{stem}.json`
///
/// The input folder is a literal underscore and the result file is named
/// after the input's file stem (`doc.pdf` becomes `doc.json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderLayout;

impl ResultLayout for PlaceholderLayout {
    fn artifact_path(
        &self,
        job_id: &JobId,
        output: &OutputLocation,
        input: &InputLocation,
    ) -> ArtifactPath {
        let name = input
            .first_object()
            .map(|object| file_stem(&object.object_name).to_string())
            .unwrap_or_else(|| DEFAULT_OBJECT_NAME.to_string());
        build_path(output, job_id, PLACEHOLDER_SEGMENT, &name)
    }
}

impl<F> ResultLayout for F
where
    F: Fn(&JobId, &OutputLocation, &InputLocation) -> ArtifactPath + Send + Sync,
{
    fn artifact_path(
        &self,
        job_id: &JobId,
        output: &OutputLocation,
        input: &InputLocation,
    ) -> ArtifactPath {
        self(job_id, output, input)
    }
}

fn build_path(output: &OutputLocation, job_id: &JobId, folder: &str, name: &str) -> ArtifactPath {
    let prefix = output.prefix.trim_matches('/');
    let object_name = if prefix.is_empty() {
        format!("{}/{}/{}/{}.json", job_id, folder, RESULTS_FOLDER, name)
    } else {
        format!(
            "{}/{}/{}/{}/{}.json",
            prefix, job_id, folder, RESULTS_FOLDER, name
        )
    };
    ArtifactPath::new(&output.namespace, &output.bucket, object_name)
}

/// Last path component without its final extension
fn file_stem(object_name: &str) -> &str {
    let base = object_name.rsplit('/').next().unwrap_or(object_name);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::ObjectLocation;

    fn output() -> OutputLocation {
        OutputLocation::new("outns", "results", "out")
    }

    #[test]
    fn test_namespaced_layout() {
        let input = InputLocation::object(ObjectLocation::new("inns", "docs", "demo.pdf"));
        let path = NamespacedLayout.artifact_path(&JobId::new("job1"), &output(), &input);
        assert_eq!(path.namespace, "outns");
        assert_eq!(path.bucket, "results");
        assert_eq!(path.object_name, "out/job1/inns_docs/results/demo.pdf.json");
    }

    #[test]
    fn test_placeholder_layout_uses_stem() {
        let input = InputLocation::object(ObjectLocation::new("ns", "b", "doc.pdf"));
        let path = PlaceholderLayout.artifact_path(&JobId::new("abc"), &output(), &input);
        assert_eq!(path.object_name, "out/abc/_/results/doc.json");
    }

    #[test]
    fn test_placeholder_layout_inline_input() {
        let input = InputLocation::inline_bytes(b"img");
        let path = PlaceholderLayout.artifact_path(&JobId::new("abc"), &output(), &input);
        assert_eq!(path.object_name, "out/abc/_/results/defaultObject.json");
    }

    #[test]
    fn test_empty_prefix_has_no_leading_slash() {
        let input = InputLocation::inline_bytes(b"img");
        let output = OutputLocation::new("ns", "b", "");
        let path = PlaceholderLayout.artifact_path(&JobId::new("abc"), &output, &input);
        assert_eq!(path.object_name, "abc/_/results/defaultObject.json");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("doc.pdf"), "doc");
        assert_eq!(file_stem("folder/scan.v2.tiff"), "scan.v2");
        assert_eq!(file_stem("README"), "README");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn test_closure_layout() {
        let layout = |job: &JobId, out: &OutputLocation, _: &InputLocation| {
            ArtifactPath::new(&out.namespace, &out.bucket, format!("custom/{job}.json"))
        };
        let path = layout.artifact_path(
            &JobId::new("j"),
            &output(),
            &InputLocation::inline_bytes(b"x"),
        );
        assert_eq!(path.object_name, "custom/j.json");
    }
}
