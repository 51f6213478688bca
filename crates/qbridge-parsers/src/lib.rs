//! Shared parsing utilities for scheduler output.
//!
//! This crate provides the unit conversions, line splitting and header
//! templating used by every qbridge adapter.

pub mod memory;
pub mod template;
pub mod time;

use qbridge_core::ParsingError;
use std::collections::HashMap;

pub use memory::{MemoryFormat, parse_memory_kib};
pub use template::HeaderTemplate;
pub use time::{format_duration_lsf, format_duration_slurm, parse_time_seconds};

/// Filter helper for optional string fields.
/// Returns None if the string is empty or a placeholder value.
pub fn non_empty_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty()
        || trimmed == "-"
        || trimmed == "N/A"
        || trimmed == "(null)"
        || trimmed == "Unknown"
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split a delimited line into exactly `expected` trimmed fields.
pub fn split_exact<'a>(
    line: &'a str,
    separator: &str,
    expected: usize,
) -> Result<Vec<&'a str>, ParsingError> {
    let fields: Vec<&str> = line.split(separator).map(str::trim).collect();
    if fields.len() != expected {
        return Err(ParsingError::new(format!(
            "Wrong number of fields. Found {}, expected {}: {}",
            fields.len(),
            expected,
            line
        )));
    }
    Ok(fields)
}

/// Parse whitespace-separated `KEY=VALUE` tokens, splitting each token on
/// its first `=`.
pub fn parse_key_values(text: &str) -> Result<HashMap<&str, &str>, ParsingError> {
    text.split_whitespace()
        .map(|token| {
            token
                .split_once('=')
                .ok_or_else(|| ParsingError::new(format!("Malformed KEY=VALUE token '{}'", token)))
        })
        .collect()
}

/// Parse an integer field, treating anything unparsable as absent.
pub fn parse_optional_int<T: std::str::FromStr>(s: &str) -> Option<T> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_string() {
        assert_eq!(non_empty_string("hello"), Some("hello".to_string()));
        assert_eq!(non_empty_string("  hello  "), Some("hello".to_string()));
        assert_eq!(non_empty_string(""), None);
        assert_eq!(non_empty_string("-"), None);
        assert_eq!(non_empty_string("N/A"), None);
        assert_eq!(non_empty_string("(null)"), None);
    }

    #[test]
    fn test_split_exact() {
        let line = "a<><> b<><> c";
        assert_eq!(split_exact(line, "<><>", 3).unwrap(), vec!["a", "b", "c"]);
        assert!(split_exact(line, "<><>", 4).is_err());
        assert!(split_exact(line, "<><>", 2).is_err());
    }

    #[test]
    fn test_parse_key_values() {
        let kv = parse_key_values("JobId=42 JobName=relax Command=/bin/a=b\n").unwrap();
        assert_eq!(kv["JobId"], "42");
        assert_eq!(kv["JobName"], "relax");
        assert_eq!(kv["Command"], "/bin/a=b");
        assert_eq!(kv.len(), 3);
    }

    #[test]
    fn test_parse_key_values_empty_value() {
        let kv = parse_key_values("Reason= QOS=normal").unwrap();
        assert_eq!(kv["Reason"], "");
        assert_eq!(kv["QOS"], "normal");
    }

    #[test]
    fn test_parse_key_values_malformed() {
        let err = parse_key_values("JobId=42 dangling").unwrap_err();
        assert!(err.message().contains("dangling"));
    }

    #[test]
    fn test_parse_optional_int() {
        assert_eq!(parse_optional_int::<u32>(" 4 "), Some(4));
        assert_eq!(parse_optional_int::<u32>("N/A"), None);
        assert_eq!(parse_optional_int::<i64>("-3"), Some(-3));
    }
}
