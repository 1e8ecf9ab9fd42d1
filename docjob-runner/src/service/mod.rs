//! Service layer for the runner
//!
//! Business logic of the submit, wait and fetch workflow.

pub mod runner;

pub use runner::{AsyncJobRunner, PollObserver, WaitOptions};
