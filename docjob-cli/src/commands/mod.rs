//! Commands module
//!
//! Defines all CLI commands and their handlers, plus the helpers they
//! share for building a runner and printing results.

mod classify;
mod extract;
mod fetch;
mod job;

pub use classify::ClassifyArgs;
pub use extract::ExtractTablesArgs;
pub use fetch::FetchArgs;
pub use job::JobCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use docjob_client::{DocumentClient, ObjectStorageClient};
use docjob_core::{JobRequest, JobState, ResultArtifact, ResultLayout};
use docjob_runner::{AsyncJobRunner, HttpContentStore, HttpJobService, RunnerConfig};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{Profile, load_profile};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify documents stored in object storage
    Classify(ClassifyArgs),
    /// Extract tables from a local document
    ExtractTables(ExtractTablesArgs),
    /// Inspect or cancel remote jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Print a stored object
    Fetch(FetchArgs),
}

/// Settings shared by every command
pub struct CommandContext {
    /// Explicit config file; the default location is used when unset
    pub config_path: Option<PathBuf>,
    pub profile_name: String,
    pub runner_config: RunnerConfig,
    /// Cancelled on Ctrl-C
    pub cancel: CancellationToken,
}

impl CommandContext {
    /// Load the selected profile
    pub fn profile(&self) -> Result<Profile> {
        load_profile(self.config_path.as_deref(), &self.profile_name)
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `ctx` - Settings shared by all commands
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, ctx: &CommandContext) -> Result<()> {
    match command {
        Commands::Classify(args) => classify::handle_classify(args, ctx).await,
        Commands::ExtractTables(args) => extract::handle_extract_tables(args, ctx).await,
        Commands::Job { command } => job::handle_job_command(command, ctx).await,
        Commands::Fetch(args) => fetch::handle_fetch(args, ctx).await,
    }
}

/// Build a runner talking to the services named in `profile`
fn build_runner(
    profile: &Profile,
    config: RunnerConfig,
    layout: Arc<dyn ResultLayout>,
) -> Result<AsyncJobRunner> {
    let documents = DocumentClient::from_config(&profile.document_client_config())
        .context("Failed to create document service client")?;
    let objects = ObjectStorageClient::from_config(&profile.object_storage_client_config())
        .context("Failed to create object storage client")?;

    Ok(AsyncJobRunner::new(
        Arc::new(HttpJobService::new(documents)),
        Arc::new(HttpContentStore::new(objects)),
        config,
    )
    .with_layout(layout))
}

/// Run one workflow, reporting each poll on stderr
async fn run_with_progress(
    runner: &AsyncJobRunner,
    request: &JobRequest,
    cancel: &CancellationToken,
) -> Result<ResultArtifact> {
    let handle = runner.submit(request).await?;
    eprintln!(
        "{} Submitted job {} ({})",
        "▸".cyan(),
        handle.id().to_string().bold(),
        request.display_name().dimmed()
    );

    let job_id = handle.id().clone();
    let options = runner.wait_options().with_observer(move |attempt: u32, state: JobState| {
        info!("Job {} poll #{}: {}", job_id, attempt, state);
        eprintln!("  poll #{:<3} {}", attempt, colorize_state(state));
    });

    let handle = runner.await_completion(handle, &options, cancel).await?;
    let path = runner.result_path(&handle);
    eprintln!("{} Fetching {}", "▸".cyan(), path.to_string().dimmed());

    Ok(runner.fetch_result(&handle, &path).await?)
}

/// Write an artifact to stdout
///
/// JSON is pretty-printed; anything else is written as-is.
fn print_artifact(artifact: &ResultArtifact) -> Result<()> {
    if let Ok(value) = artifact.json::<serde_json::Value>() {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(artifact.as_bytes())
        .context("Failed to write result to stdout")?;
    stdout.flush()?;
    Ok(())
}

/// Colorize job state for display
fn colorize_state(state: JobState) -> ColoredString {
    let text = state.to_string();
    match state {
        JobState::Submitted => text.yellow(),
        JobState::InProgress => text.cyan(),
        JobState::Cancelling => text.yellow(),
        JobState::Succeeded => text.green(),
        JobState::Failed => text.red(),
        JobState::Cancelled => text.dimmed(),
    }
}
