//! # Buffer-Size Parser
//!
//! Purpose: Turn human-readable sizes such as `"4kb"` or `"1 MB"` into byte
//! counts for the client's message bounds.
//!
//! ## Design Principles
//! 1. **Whole-Input Match**: The entire string must be exactly one
//!    number/unit pair; anything else is rejected.
//! 2. **Explicit Sentinel**: `None` marks invalid input, distinct from every
//!    valid byte count (including zero).
//! 3. **Compile Once**: The pattern is built on first use and shared by all
//!    callers, so parsing is safe from any thread.

use std::sync::OnceLock;

use regex::Regex;

/// Bytes in one kilobyte.
pub const KB: usize = 1024;

/// Bytes in one megabyte.
pub const MB: usize = 1024 * 1024;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*([a-zA-Z]+)\s*$").expect("size pattern is valid")
    })
}

/// Parses a buffer size such as `"123kb"` into a byte count.
///
/// Units are matched case-insensitively against `kb` and `mb`. Returns `None`
/// for empty input, extra tokens, an unknown unit, a magnitude above
/// `i32::MAX`, or a byte count that does not fit in `usize`.
///
/// # Examples
/// ```rust
/// use tkv_common::parse_buffer_size;
///
/// assert_eq!(parse_buffer_size("1kb"), Some(1024));
/// assert_eq!(parse_buffer_size(" 2 MB "), Some(2 * 1024 * 1024));
/// assert_eq!(parse_buffer_size("123mBb"), None);
/// ```
pub fn parse_buffer_size(input: &str) -> Option<usize> {
    let mut matches = size_pattern().captures_iter(input);
    let captures = matches.next()?;
    if matches.next().is_some() {
        return None;
    }

    // Magnitudes are bounded to 32-bit signed values.
    let magnitude: i32 = captures.get(1)?.as_str().parse().ok()?;
    let magnitude = usize::try_from(magnitude).ok()?;
    let multiplier = unit_multiplier(captures.get(2)?.as_str())?;
    magnitude.checked_mul(multiplier)
}

fn unit_multiplier(unit: &str) -> Option<usize> {
    if unit.eq_ignore_ascii_case("kb") {
        Some(KB)
    } else if unit.eq_ignore_ascii_case("mb") {
        Some(MB)
    } else {
        None
    }
}
