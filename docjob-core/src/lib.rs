//! Docjob Core
//!
//! Core types for submitting document-processing jobs and retrieving
//! their results.
//!
//! This crate contains:
//! - Domain types: requests, job handles, lifecycle states, artifacts and
//!   result path layouts
//! - DTOs: wire shapes exchanged with the document service

pub mod domain;
pub mod dto;

pub use domain::artifact::{ArtifactPath, ResultArtifact};
pub use domain::job::{JobHandle, JobId, JobState};
pub use domain::layout::{NamespacedLayout, PlaceholderLayout, ResultLayout};
pub use domain::request::{
    Feature, InputLocation, JobRequest, ObjectLocation, OutputLocation, RequestError,
};
