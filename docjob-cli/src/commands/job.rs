//! Job command handlers
//!
//! Inspects and cancels remote jobs by id.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use docjob_client::DocumentClient;
use docjob_core::JobId;
use docjob_core::dto::job::ProcessorJob;
use docjob_runner::{HttpJobService, JobService};

use super::{CommandContext, colorize_state};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Get job details
    Get {
        /// Job ID
        id: String,
    },
    /// Ask the service to cancel a job
    Cancel {
        /// Job ID
        id: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `ctx` - Settings shared by all commands
pub async fn handle_job_command(command: JobCommands, ctx: &CommandContext) -> Result<()> {
    let profile = ctx.profile()?;
    let client = DocumentClient::from_config(&profile.document_client_config())
        .context("Failed to create document service client")?;

    match command {
        JobCommands::Get { id } => get_job(&client, &JobId::new(id)).await,
        JobCommands::Cancel { id } => {
            cancel_job(&HttpJobService::new(client), &JobId::new(id)).await
        }
    }
}

/// Get and display a single job
async fn get_job(client: &DocumentClient, id: &JobId) -> Result<()> {
    let job = client
        .get_processor_job(id)
        .await
        .with_context(|| format!("Failed to get job {}", id))?;

    print_job_details(&job);

    Ok(())
}

/// Request cancellation of a job
async fn cancel_job(jobs: &dyn JobService, id: &JobId) -> Result<()> {
    jobs.cancel(id)
        .await
        .with_context(|| format!("Failed to cancel job {}", id))?;

    println!(
        "{} Cancellation requested for job {}",
        "✓".green(),
        id.to_string().cyan()
    );

    Ok(())
}

/// Print detailed job information
fn print_job_details(job: &ProcessorJob) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.to_string().cyan());
    if let Some(name) = &job.display_name {
        println!("  Name:        {}", name);
    }
    println!("  State:       {}", colorize_state(job.lifecycle_state));
    if let Some(details) = &job.lifecycle_details {
        println!("  Details:     {}", details.dimmed());
    }
    if let Some(percent) = job.percent_complete {
        println!("  Progress:    {:.0}%", percent);
    }

    if let Some(accepted) = job.time_accepted {
        println!("  Accepted:    {}", accepted.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(started) = job.time_started {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(finished) = job.time_finished {
        println!("  Finished:    {}", finished.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = job.time_started {
            let duration = finished.signed_duration_since(started);
            println!("  Duration:    {}s", duration.num_seconds());
        }
    }
}
