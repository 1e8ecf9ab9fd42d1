//! Classify command handler
//!
//! Runs document classification on objects already in object storage.
//! A single object streams its progress; several objects run as a
//! concurrent batch.

use anyhow::Result;
use clap::Args;
use colored::*;
use docjob_core::{Feature, InputLocation, JobRequest, NamespacedLayout, ObjectLocation, OutputLocation};
use docjob_runner::{BatchOutcome, run_batch};
use std::sync::Arc;

use super::{CommandContext, build_runner, print_artifact, run_with_progress};

/// Arguments for `classify`
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Namespace holding the input documents
    #[arg(long)]
    pub namespace: String,

    /// Bucket holding the input documents
    #[arg(long)]
    pub bucket: String,

    /// Object name of a document to classify (repeatable)
    #[arg(long = "object", required = true)]
    pub objects: Vec<String>,

    /// Namespace results are written to
    #[arg(long)]
    pub output_namespace: String,

    /// Bucket results are written to
    #[arg(long)]
    pub output_bucket: String,

    /// Prefix under which results are written
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Compartment override (defaults to the profile's)
    #[arg(long)]
    pub compartment: Option<String>,

    /// Maximum number of classification results per document
    #[arg(long)]
    pub max_results: Option<u32>,
}

impl ClassifyArgs {
    /// One request per object, all sharing the same output location
    fn requests(&self, compartment: &str) -> Vec<JobRequest> {
        let output = OutputLocation::new(&self.output_namespace, &self.output_bucket, &self.prefix);
        self.objects
            .iter()
            .map(|object| {
                JobRequest::new(
                    compartment,
                    InputLocation::object(ObjectLocation::new(&self.namespace, &self.bucket, object)),
                    output.clone(),
                )
                .with_feature(Feature::DocumentClassification {
                    max_results: self.max_results,
                })
            })
            .collect()
    }
}

/// Handle the classify command
pub async fn handle_classify(args: ClassifyArgs, ctx: &CommandContext) -> Result<()> {
    let profile = ctx.profile()?;
    let compartment = args.compartment.as_deref().unwrap_or(&profile.compartment_id);
    let runner = build_runner(&profile, ctx.runner_config.clone(), Arc::new(NamespacedLayout))?;
    let mut requests = args.requests(compartment);

    if requests.len() == 1 {
        let request = requests.remove(0);
        let artifact = run_with_progress(&runner, &request, &ctx.cancel).await?;
        return print_artifact(&artifact);
    }

    eprintln!(
        "{}",
        format!("Classifying {} document(s):", requests.len()).bold()
    );

    let outcomes = run_batch(&runner, requests, &ctx.cancel).await;
    let mut failures = 0;

    for (object, outcome) in args.objects.iter().zip(&outcomes) {
        match outcome {
            BatchOutcome::Completed { artifact, .. } => {
                eprintln!("{} {}", "✓".green(), object.bold());
                print_artifact(artifact)?;
            }
            BatchOutcome::Failed { error, .. } => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), object.bold(), error.to_string().red());
            }
            BatchOutcome::Skipped { .. } => {
                failures += 1;
                eprintln!("{} {}: {}", "-".dimmed(), object.bold(), "skipped".dimmed());
            }
            BatchOutcome::Panicked { message, .. } => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), object.bold(), message.red());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} document(s) failed", failures, outcomes.len());
    }

    Ok(())
}
