//! Timestamp utilities
//!
//! Run timestamps are stored as RFC 3339 text with fixed millisecond precision so that
//! lexical ordering in SQLite matches chronological ordering.

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Render a timestamp in the stored/reported form (`2024-01-01T00:00:00.000Z`)
pub fn to_iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn test_now_successive_calls_advance() {
        let time1 = now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let time2 = now();
        assert!(time2 > time1);
    }

    #[test]
    fn test_iso8601_fixed_width() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(to_iso8601(&ts), "2024-03-05T07:08:09.000Z");
    }

    #[test]
    fn test_iso8601_lexical_order_matches_time_order() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 9, 59, 59).unwrap();
        let later = earlier + chrono::Duration::milliseconds(1);
        assert!(to_iso8601(&earlier) < to_iso8601(&later));
    }

    #[test]
    fn test_iso8601_parses_back_to_same_instant() {
        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        let parsed = DateTime::parse_from_rfc3339(&to_iso8601(&ts)).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), ts);
    }
}
