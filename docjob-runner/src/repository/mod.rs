//! Repository layer
//!
//! Repositories are thin adapters over the remote collaborators: the job
//! service and the content store. They provide focused interfaces without
//! any workflow logic.
//!
//! All repositories are trait-based to enable testing and mocking.

mod jobs;
mod store;

// Re-export traits
pub use jobs::JobService;
pub use store::ContentStore;

// Re-export implementations
pub use jobs::HttpJobService;
pub use store::{HttpContentStore, InMemoryContentStore};
