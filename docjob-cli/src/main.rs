//! Docjob CLI
//!
//! Command-line interface for running document-processing jobs: submit,
//! wait for completion and print the result.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{CommandContext, Commands, handle_command};
use config::DEFAULT_PROFILE;
use docjob_runner::RunnerConfig;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docjob")]
#[command(about = "Run asynchronous document-processing jobs", long_about = None)]
struct Cli {
    /// Config file with connection profiles [default: ~/.docjob/config.toml]
    #[arg(long, env = "DOCJOB_CONFIG")]
    config: Option<PathBuf>,

    /// Profile to use from the config file
    #[arg(long, env = "DOCJOB_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Seconds between status polls (disables backoff)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Seconds to wait for a job before giving up
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Runner settings from the environment, overridden by flags
    fn runner_config(&self) -> Result<RunnerConfig> {
        let mut config = RunnerConfig::from_env();
        if let Some(secs) = self.poll_interval {
            config = config.with_fixed_interval(Duration::from_secs(secs));
        }
        if let Some(secs) = self.timeout {
            config = config.with_job_timeout(Duration::from_secs(secs));
        }
        config.validate().context("Invalid runner settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docjob=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling wait");
            on_interrupt.cancel();
        }
    });

    let ctx = CommandContext {
        runner_config: cli.runner_config()?,
        config_path: cli.config,
        profile_name: cli.profile,
        cancel,
    };

    handle_command(cli.command, &ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_runner_settings() {
        let cli = Cli::try_parse_from([
            "docjob",
            "--poll-interval",
            "2",
            "--timeout",
            "60",
            "job",
            "get",
            "job-1",
        ])
        .unwrap();

        let config = cli.runner_config().unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.job_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_classify_requires_an_object() {
        let result = Cli::try_parse_from([
            "docjob",
            "classify",
            "--namespace",
            "ns",
            "--bucket",
            "docs",
            "--output-namespace",
            "ns",
            "--output-bucket",
            "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(["docjob", "--timeout", "0", "job", "get", "job-1"]).unwrap();
        assert!(cli.runner_config().is_err());
    }
}
