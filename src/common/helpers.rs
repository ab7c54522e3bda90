// Timestamp helpers shared by the stores and handlers

use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as an RFC3339 string with second precision.
///
/// Both store backends persist timestamps in this format; equal-length
/// RFC3339 strings compare chronologically, which the summary windows
/// rely on.
pub fn utc_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
