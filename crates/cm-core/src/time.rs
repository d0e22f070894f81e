//! UTC timestamps in ISO-8601 form, without a calendar dependency.
//!
//! Records carry these as strings; because the format is fixed-width and
//! zero-padded, lexicographic order equals chronological order, which the
//! eviction sort relies on.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC timestamp, e.g. `2026-08-25T14:03:07Z`.
pub fn now_iso8601() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    unix_to_iso8601(secs)
}

/// Render Unix seconds as an ISO-8601 UTC string.
pub fn unix_to_iso8601(secs: u64) -> String {
    let (y, m, d) = civil_from_days((secs / 86400) as i64);
    let rem = secs % 86400;
    format!(
        "{y:04}-{m:02}-{d:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since the Unix epoch → (year, month, day), per Howard Hinnant's
/// civil_from_days.
fn civil_from_days(days: i64) -> (i64, u64, u64) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe as i64 + era * 400 + i64::from(m <= 2);
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_start() {
        assert_eq!(unix_to_iso8601(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29T12:30:45Z
        assert_eq!(unix_to_iso8601(1709209845), "2024-02-29T12:30:45Z");
    }

    #[test]
    fn test_year_boundary() {
        // One second before and after 2026
        assert_eq!(unix_to_iso8601(1767225599), "2025-12-31T23:59:59Z");
        assert_eq!(unix_to_iso8601(1767225600), "2026-01-01T00:00:00Z");
    }

    #[test]
    fn test_lexicographic_order_is_chronological() {
        let earlier = unix_to_iso8601(1700000000);
        let later = unix_to_iso8601(1700000001);
        assert!(earlier < later);
    }

    #[test]
    fn test_now_looks_sane() {
        let ts = now_iso8601();
        assert_eq!(ts.len(), 20, "unexpected timestamp shape: {ts}");
        assert!(ts.ends_with('Z'));
    }
}
