//! Poll delay policy
//!
//! Delays never shrink from one attempt to the next.

use std::time::Duration;

/// Delay between consecutive state polls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay after every poll
    Fixed(Duration),
    /// `initial * factor^(attempt - 1)`, capped at `max`
    Exponential {
        initial: Duration,
        max: Duration,
        factor: f64,
    },
}

impl Backoff {
    /// Delay to wait after poll number `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(interval) => interval,
            Backoff::Exponential {
                initial,
                max,
                factor,
            } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let scaled = initial.as_secs_f64() * factor.max(1.0).powi(exponent);
                if !scaled.is_finite() || scaled >= max.as_secs_f64() {
                    max.max(initial)
                } else {
                    Duration::from_secs_f64(scaled).max(initial)
                }
            }
        }
    }
}
