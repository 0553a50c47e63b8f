// SPDX-License-Identifier: MIT

//! Time utilities for entry timestamps.
//!
//! Timestamps are stored in UTC and rendered in the local offset when one can
//! be determined, UTC otherwise.

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Returns the current UTC time.
#[inline]
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Returns the current local UTC offset, falling back to UTC.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` in the local offset.
pub fn format_timestamp(t: OffsetDateTime) -> String {
    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    t.to_offset(local_offset())
        .format(&fmt)
        .unwrap_or_else(|_| t.unix_timestamp().to_string())
}

/// Same as [`format_timestamp`], with an empty string for `None`.
pub fn format_optional(t: Option<OffsetDateTime>) -> String {
    t.map(format_timestamp).unwrap_or_default()
}
