//! Runner configuration
//!
//! Defines the tunables of the submit/poll/fetch workflow: polling cadence,
//! the overall wait deadline and how many workflows may run at once.

use std::time::Duration;

use crate::backoff::Backoff;

/// Runner configuration
///
/// Passed explicitly to the runner; nothing here is read from globals
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Delay between the first and second state poll
    pub poll_interval: Duration,

    /// Upper bound on the delay between polls once backoff grows
    pub max_poll_interval: Duration,

    /// Growth factor applied to the poll delay after each poll
    /// (1.0 keeps a fixed cadence)
    pub backoff_factor: f64,

    /// Maximum time to wait for a job to reach a terminal state
    pub job_timeout: Duration,

    /// Max workflows a batch runs concurrently
    pub max_parallel_jobs: usize,
}

impl RunnerConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_poll_interval: Duration::from_secs(30),
            backoff_factor: 1.5,
            job_timeout: Duration::from_secs(1200), // 20 minutes
            max_parallel_jobs: 4,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - DOCJOB_POLL_INTERVAL (seconds, default: 5)
    /// - DOCJOB_MAX_POLL_INTERVAL (seconds, default: 30)
    /// - DOCJOB_BACKOFF_FACTOR (default: 1.5)
    /// - DOCJOB_JOB_TIMEOUT (seconds, default: 1200)
    /// - DOCJOB_MAX_PARALLEL_JOBS (default: 4)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();

        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let poll_interval = secs("DOCJOB_POLL_INTERVAL", defaults.poll_interval);
        let max_poll_interval = secs("DOCJOB_MAX_POLL_INTERVAL", defaults.max_poll_interval);
        let job_timeout = secs("DOCJOB_JOB_TIMEOUT", defaults.job_timeout);

        let backoff_factor = lookup("DOCJOB_BACKOFF_FACTOR")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(defaults.backoff_factor);

        let max_parallel_jobs = lookup("DOCJOB_MAX_PARALLEL_JOBS")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(defaults.max_parallel_jobs);

        Self {
            poll_interval,
            max_poll_interval,
            backoff_factor,
            job_timeout,
            max_parallel_jobs,
        }
    }

    /// Sets a fixed poll cadence
    pub fn with_fixed_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self.max_poll_interval = interval;
        self.backoff_factor = 1.0;
        self
    }

    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = timeout;
        self
    }

    pub fn with_max_parallel_jobs(mut self, n: usize) -> Self {
        self.max_parallel_jobs = n;
        self
    }

    /// Backoff policy described by this configuration
    pub fn backoff(&self) -> Backoff {
        if self.backoff_factor <= 1.0 || self.max_poll_interval <= self.poll_interval {
            Backoff::Fixed(self.poll_interval)
        } else {
            Backoff::Exponential {
                initial: self.poll_interval,
                max: self.max_poll_interval,
                factor: self.backoff_factor,
            }
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_poll_interval < self.poll_interval {
            anyhow::bail!("max_poll_interval must not be shorter than poll_interval");
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            anyhow::bail!("backoff_factor must be a finite number >= 1.0");
        }

        if self.job_timeout.is_zero() {
            anyhow::bail!("job_timeout must be greater than 0");
        }

        if self.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_poll_interval, Duration::from_secs(30));
        assert_eq!(config.max_parallel_jobs, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RunnerConfig::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_secs(60);
        assert!(config.validate().is_err(), "max below initial interval");

        config.poll_interval = Duration::from_secs(5);
        config.backoff_factor = 0.5;
        assert!(config.validate().is_err());

        config.backoff_factor = 2.0;
        config.max_parallel_jobs = 0;
        assert!(config.validate().is_err());

        config.max_parallel_jobs = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("DOCJOB_POLL_INTERVAL", "2"),
            ("DOCJOB_JOB_TIMEOUT", "60"),
            ("DOCJOB_MAX_PARALLEL_JOBS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = RunnerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.job_timeout, Duration::from_secs(60));
        assert_eq!(config.max_parallel_jobs, 4);
        assert_eq!(config.max_poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_selection() {
        let fixed = RunnerConfig::default().with_fixed_interval(Duration::from_secs(3));
        assert_eq!(fixed.backoff(), Backoff::Fixed(Duration::from_secs(3)));

        let growing = RunnerConfig::default();
        assert!(matches!(growing.backoff(), Backoff::Exponential { .. }));
    }
}
