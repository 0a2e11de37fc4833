//! Catalog model types.

mod availability;
mod geometry;
mod product;

pub use availability::*;
pub use geometry::*;
pub use product::*;

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};

/// Fixed timestamp pattern used by the catalog (`YYYY-MM-DDTHH:MM:SSZ`, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Character layout of [`TIMESTAMP_FORMAT`]; `d` stands for one ASCII digit.
const TIMESTAMP_LAYOUT: &[u8; 20] = b"dddd-dd-ddTdd:dd:ddZ";

/// Parse a catalog timestamp. Anything but the fixed pattern is rejected,
/// including unpadded fields, signed years and leap seconds.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == TIMESTAMP_LAYOUT.len()
        && bytes
            .iter()
            .zip(TIMESTAMP_LAYOUT)
            .all(|(byte, expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                _ => byte == expected,
            });
    if !shaped {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()?;
    // chrono keeps second 60 as a leap nanosecond offset
    if naive.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(Utc.from_utc_datetime(&naive))
}

/// Render a timestamp in the catalog's fixed pattern.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
