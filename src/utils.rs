//! Utility functions for the fleet server

use chrono::{DateTime, Utc};

/// Formats a DateTime to RFC 3339 with millisecond precision
///
/// Example output: "2025-06-14T10:03:54.374Z"
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Gets the current time formatted for API responses and storage
pub fn current_datetime() -> String {
    format_datetime(Utc::now())
}
