//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `created_at` and `last_modified`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Move `current` forward to `candidate`, never backwards.
///
/// Keeps `last_modified` monotonic even if the wall clock steps back.
#[must_use]
pub fn advance(current: Timestamp, candidate: Timestamp) -> Timestamp {
    current.max(candidate)
}
