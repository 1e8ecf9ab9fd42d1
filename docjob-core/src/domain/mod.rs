//! Core domain types
//!
//! These types describe a job from the caller's side: what is submitted,
//! how the remote job is tracked and what comes back once it succeeds.

pub mod artifact;
pub mod job;
pub mod layout;
pub mod request;
