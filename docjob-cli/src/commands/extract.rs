//! Extract-tables command handler
//!
//! Sends a local document inline and prints the extracted tables.

use anyhow::{Context, Result};
use clap::Args;
use docjob_core::{Feature, InputLocation, JobRequest, OutputLocation, PlaceholderLayout};
use std::path::PathBuf;
use std::sync::Arc;

use super::{CommandContext, build_runner, print_artifact, run_with_progress};

/// Arguments for `extract-tables`
#[derive(Args, Debug)]
pub struct ExtractTablesArgs {
    /// Local document to upload inline
    #[arg(short, long)]
    pub file: PathBuf,

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
}

impl ExtractTablesArgs {
    fn request(&self, compartment: &str, document: &[u8]) -> JobRequest {
        JobRequest::new(
            compartment,
            InputLocation::inline_bytes(document),
            OutputLocation::new(&self.output_namespace, &self.output_bucket, &self.prefix),
        )
        .with_feature(Feature::table_extraction())
    }
}

/// Handle the extract-tables command
pub async fn handle_extract_tables(args: ExtractTablesArgs, ctx: &CommandContext) -> Result<()> {
    let profile = ctx.profile()?;
    let compartment = args.compartment.as_deref().unwrap_or(&profile.compartment_id);

    let document = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read document {}", args.file.display()))?;

    let runner = build_runner(&profile, ctx.runner_config.clone(), Arc::new(PlaceholderLayout))?;
    let request = args.request(compartment, &document);

    let artifact = run_with_progress(&runner, &request, &ctx.cancel).await?;
    print_artifact(&artifact)
}
