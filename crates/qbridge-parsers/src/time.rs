//! Time parsing and formatting utilities for scheduler output.

use qbridge_core::ParsingError;

/// Literals that mean "no limit" rather than a duration.
const NO_LIMIT: &[&str] = &["UNLIMITED", "NOT_SET"];

/// Parse a SLURM-style duration to whole seconds.
///
/// Supports:
/// - M, M:S, H:M:S
/// - D-H, D-H:M, D-H:M:S
///
/// Returns `Ok(None)` for empty strings, "UNLIMITED" and "NOT_SET".
pub fn parse_time_seconds(s: &str) -> Result<Option<u64>, ParsingError> {
    let s = s.trim();
    if s.is_empty() || NO_LIMIT.contains(&s) {
        return Ok(None);
    }

    let invalid = || ParsingError::new(format!("Invalid time string '{}'", s));
    let number = |p: &str| -> Result<u64, ParsingError> {
        if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        p.parse().map_err(|_| invalid())
    };

    let (days, clock) = match s.split_once('-') {
        Some((d, rest)) => (Some(number(d)?), rest),
        None => (None, s),
    };

    let parts = clock
        .split(':')
        .map(number)
        .collect::<Result<Vec<u64>, _>>()?;

    let (hours, minutes, seconds) = match (days.is_some(), parts.as_slice()) {
        (_, [h, m, sec]) => (*h, *m, *sec),
        (true, [h, m]) => (*h, *m, 0),
        (true, [h]) => (*h, 0, 0),
        (false, [m, sec]) => (0, *m, *sec),
        (false, [m]) => (0, *m, 0),
        _ => return Err(invalid()),
    };

    days.unwrap_or(0)
        .checked_mul(86400)
        .and_then(|t| t.checked_add(hours.checked_mul(3600)?))
        .and_then(|t| t.checked_add(minutes.checked_mul(60)?))
        .and_then(|t| t.checked_add(seconds))
        .map(Some)
        .ok_or_else(invalid)
}

/// Format seconds as SLURM duration format (D-HH:MM:SS).
pub fn format_duration_slurm(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}-{:02}:{:02}:{:02}", days, hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    }
}

/// Format seconds as LSF duration format (H:MM for resource limits).
///
/// LSF limits have minute resolution; partial minutes round up.
pub fn format_duration_lsf(seconds: u64) -> String {
    let total_mins = seconds.div_ceil(60);
    format!("{}:{:02}", total_mins / 60, total_mins % 60)
}
