//! Data Transfer Objects for the document service
//!
//! DTOs are the JSON shapes sent to and received from the remote job
//! service. Domain types convert into and out of them at the client edge.

pub mod job;
