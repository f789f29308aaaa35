//! Coverage lookups against Code Climate.
//!
//! A lookup turns one [`BranchRef`](crate::types::BranchRef) into a coverage
//! percentage, or reports that the service has not yet measured that exact
//! commit. "Not yet" is an ordinary answer, not an error: Code Climate
//! processes uploads asynchronously and the webhook usually arrives first.

mod client;
mod error;
mod lookup;

pub use client::{CodeClimateClient, CoverageRepoId, RepoEntry};
pub use error::LookupError;
pub use lookup::{CoverageLookup, CoverageReading, find_repo_id, reading_for};
