//! Human-readable status descriptions.
//!
//! Coverage deltas are percentage points (`head - base`). They are shown with
//! at most two decimal places so float noise such as `0.30000000000000004`
//! never reaches the pull request page. A non-zero delta never reads as `0%`.

use super::CommitState;

/// Description sent with every `pending` status.
pub const PENDING_DESCRIPTION: &str = "Coverage is being collected.";

/// Description sent when head and base coverage are equal.
pub const UNCHANGED_DESCRIPTION: &str = "Coverage is the same";

/// GitHub rejects status descriptions longer than this.
pub const GITHUB_DESCRIPTION_LIMIT: usize = 140;

/// Maps a coverage delta to the terminal status state and its description.
///
/// The state is decided on the raw delta; only the text is rounded.
pub fn describe_coverage(delta: f64) -> (CommitState, String) {
    if delta < 0.0 {
        (
            CommitState::Failure,
            format!("Coverage decreased by {}%", format_points(-delta)),
        )
    } else if delta > 0.0 {
        (
            CommitState::Success,
            format!("Coverage increased by {}%", format_points(delta)),
        )
    } else {
        (CommitState::Success, UNCHANGED_DESCRIPTION.to_string())
    }
}

/// Formats a positive number of percentage points, trimming trailing zeros.
///
/// Changes too small to survive rounding are shown as `less than 0.01` so the
/// text never reads as zero.
fn format_points(points: f64) -> String {
    let rounded = (points * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "less than 0.01".to_string();
    }
    format!("{}", rounded)
}

/// Truncates a description to GitHub's limit, ending it with `...` when cut.
pub fn truncate_description(description: String) -> String {
    const SUFFIX: &str = "...";

    if description.len() <= GITHUB_DESCRIPTION_LIMIT {
        return description;
    }

    let mut end = GITHUB_DESCRIPTION_LIMIT - SUFFIX.len();
    while end > 0 && !description.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &description[..end], SUFFIX)
}
