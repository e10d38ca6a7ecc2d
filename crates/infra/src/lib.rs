//! `crewgate-infra` — reference implementations of the collaborator seams.
//!
//! Real deployments back [`crewgate_auth::Directory`] with their own store;
//! the in-memory directory here serves embedders and integration tests.

pub mod directory;

pub use directory::InMemoryDirectory;
