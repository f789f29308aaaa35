//! Combining the two lookups of one polling cycle.

use crate::coverage::{CoverageReading, LookupError};

/// The result of one polling cycle.
#[derive(Debug)]
pub enum CoverageOutcome {
    /// At least one side has no coverage for its exact commit yet.
    Pending,

    /// Both sides resolved. `delta` is `head - base` in percentage points.
    Resolved { delta: f64 },

    /// A lookup failed. Failures end polling; they are never retried.
    Failed(LookupError),
}

/// Folds the head and base lookup results into a cycle outcome.
///
/// A failure on either side wins over a pending answer on the other, and the
/// head's failure is reported when both fail.
pub fn evaluate_cycle(
    head: Result<CoverageReading, LookupError>,
    base: Result<CoverageReading, LookupError>,
) -> CoverageOutcome {
    match (head, base) {
        (Err(err), _) | (_, Err(err)) => CoverageOutcome::Failed(err),
        (Ok(CoverageReading::Ready(head)), Ok(CoverageReading::Ready(base))) => {
            CoverageOutcome::Resolved { delta: head - base }
        }
        _ => CoverageOutcome::Pending,
    }
}
