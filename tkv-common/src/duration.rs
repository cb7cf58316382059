//! # Duration Parser
//!
//! Parse config durations like `"5s"`, `"500ms"`, or `"infinite"`.

use std::time::Duration;

/// Keyword accepted in place of a duration to mean "no deadline".
pub const INFINITE: &str = "infinite";

/// Parses a duration string.
///
/// Accepts `ms`, `s`, `m` and `h` suffixes, a bare integer (seconds), and the
/// keyword `infinite`, which maps to `Duration::ZERO`.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let s = input.trim();
    if s.eq_ignore_ascii_case(INFINITE) {
        return Some(Duration::ZERO);
    }

    if let Some(ms) = s.strip_suffix("ms") {
        return parse_u64(ms).map(Duration::from_millis);
    }
    if let Some(secs) = s.strip_suffix('s') {
        return parse_u64(secs).map(Duration::from_secs);
    }
    if let Some(mins) = s.strip_suffix('m') {
        return parse_u64(mins)?.checked_mul(60).map(Duration::from_secs);
    }
    if let Some(hours) = s.strip_suffix('h') {
        return parse_u64(hours)?.checked_mul(3600).map(Duration::from_secs);
    }
    parse_u64(s).map(Duration::from_secs)
}

fn parse_u64(digits: &str) -> Option<u64> {
    let digits = digits.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn parse_duration_plain_number_as_seconds() {
        assert_eq!(parse_duration("10"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn parse_duration_infinite_is_zero() {
        assert_eq!(parse_duration("infinite"), Some(Duration::ZERO));
        assert_eq!(parse_duration(" Infinite "), Some(Duration::ZERO));
    }

    #[test]
    fn parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("-5s"), None);
        assert_eq!(parse_duration("five seconds"), None);
        assert_eq!(parse_duration("1.5s"), None);
    }
}
