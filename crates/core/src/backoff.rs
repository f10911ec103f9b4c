//! Retry-After backoff policy for flaky upstream generation providers.
//!
//! Every pipeline stage that calls a text or image provider runs the
//! delay computed here before its next attempt. The retry loop itself
//! lives with the caller (see `fable_engine::retry`); this module only
//! turns a server-supplied hint into a wait duration.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Compute the wait before retrying an upstream call.
///
/// The `Retry-After` header is honored in both standard forms:
///
/// - a non-negative integer number of seconds;
/// - an HTTP-date, in which case the delay is the time remaining until
///   that instant (zero if it is already past).
///
/// An absent or unparsable header falls back to `default`. Never fails
/// and never returns a negative delay.
pub fn compute_delay(retry_after: Option<&str>, default: Duration) -> Duration {
    delay_at(retry_after, default, Utc::now())
}

/// Clock-injected variant of [`compute_delay`] so tests control "now".
pub fn delay_at(retry_after: Option<&str>, default: Duration, now: DateTime<Utc>) -> Duration {
    let Some(header) = retry_after else {
        return default;
    };
    let header = header.trim();

    if let Ok(seconds) = header.parse::<u64>() {
        return Duration::from_secs(seconds);
    }

    if let Some(timestamp) = parse_http_date(header) {
        let remaining_ms = (timestamp - now).num_milliseconds().max(0);
        return Duration::from_millis(remaining_ms as u64);
    }

    default
}

/// Parse an HTTP-date header value.
///
/// RFC 7231 dates are RFC 2822-compatible (`Tue, 01 Jul 2025 10:00:00
/// GMT`); fall back to RFC 3339 for lenient upstreams that send ISO
/// timestamps.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: Duration = Duration::from_millis(1000);

    #[test]
    fn seconds_header_converts_to_millis() {
        assert_eq!(
            compute_delay(Some("2"), DEFAULT),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn zero_seconds_is_zero_delay() {
        assert_eq!(compute_delay(Some("0"), DEFAULT), Duration::ZERO);
    }

    #[test]
    fn absent_header_returns_default() {
        assert_eq!(compute_delay(None, DEFAULT), DEFAULT);
    }

    #[test]
    fn garbage_header_returns_default() {
        assert_eq!(compute_delay(Some("soonish"), DEFAULT), DEFAULT);
    }

    #[test]
    fn negative_seconds_is_not_a_valid_count() {
        // "-5" fails the u64 parse and is not a date, so default applies.
        assert_eq!(compute_delay(Some("-5"), DEFAULT), DEFAULT);
    }

    #[test]
    fn future_http_date_yields_remaining_time() {
        let now = Utc::now();
        let header = (now + chrono::Duration::milliseconds(1500)).to_rfc2822();

        let delay = delay_at(Some(&header), DEFAULT, now);
        // RFC 2822 has one-second resolution, so allow for truncation.
        assert!(delay > Duration::from_millis(500), "got {delay:?}");
        assert!(delay <= Duration::from_millis(1500), "got {delay:?}");
    }

    #[test]
    fn past_http_date_yields_zero_not_negative() {
        let now = Utc::now();
        let header = (now - chrono::Duration::seconds(30)).to_rfc2822();

        assert_eq!(delay_at(Some(&header), DEFAULT, now), Duration::ZERO);
    }

    #[test]
    fn rfc3339_timestamps_are_tolerated() {
        let now = Utc::now();
        let header = (now + chrono::Duration::seconds(2)).to_rfc3339();

        let delay = delay_at(Some(&header), DEFAULT, now);
        assert!(delay > Duration::from_millis(1900), "got {delay:?}");
        assert!(delay <= Duration::from_millis(2000), "got {delay:?}");
    }
}
