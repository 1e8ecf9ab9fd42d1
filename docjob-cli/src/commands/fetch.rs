//! Fetch command handler
//!
//! Prints an object straight from object storage, e.g. a result written
//! by an earlier job.

use anyhow::{Context, Result};
use clap::Args;
use docjob_client::ObjectStorageClient;
use docjob_core::{ArtifactPath, ResultArtifact};

use super::{CommandContext, print_artifact};

/// Arguments for `fetch`
#[derive(Args, Debug)]
pub struct FetchArgs {
    #[arg(long)]
    pub namespace: String,

    #[arg(long)]
    pub bucket: String,

    /// Full object name, including any prefix
    #[arg(long)]
    pub object: String,
}

/// Handle the fetch command
pub async fn handle_fetch(args: FetchArgs, ctx: &CommandContext) -> Result<()> {
    let profile = ctx.profile()?;
    let client = ObjectStorageClient::from_config(&profile.object_storage_client_config())
        .context("Failed to create object storage client")?;

    let path = ArtifactPath::new(args.namespace, args.bucket, args.object);
    let content = client
        .get_object(&path)
        .await
        .with_context(|| format!("Failed to fetch {}", path))?;

    print_artifact(&ResultArtifact::new(path, content))
}
