//! Memory parsing utilities for scheduler output.

use qbridge_core::ParsingError;

/// Memory format variants for different schedulers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFormat {
    /// SLURM format: "4G", "1000M", "4096K", "4096" (no spaces)
    Slurm,
    /// SLURM sacct format: "4Gn", "1000Mc" (with per-node/per-core suffix)
    SlurmSacct,
    /// LSF format: "4 GB", "1000 MB", "1.5 GB" (with spaces)
    Lsf,
}

/// Parse a memory string to KiB.
///
/// The unit letter selects a binary multiplier (K=1024^0 .. T=1024^3 KiB).
/// A bare number carries no unit and is read as MiB.
pub fn parse_memory_kib(s: &str, format: MemoryFormat) -> Result<u64, ParsingError> {
    match format {
        MemoryFormat::Slurm => parse_slurm_memory(s),
        MemoryFormat::SlurmSacct => parse_slurm_sacct_memory(s),
        MemoryFormat::Lsf => parse_lsf_memory(s),
    }
}

fn unit_power(unit: char) -> Option<u32> {
    match unit.to_ascii_uppercase() {
        'K' => Some(0),
        'M' => Some(1),
        'G' => Some(2),
        'T' => Some(3),
        _ => None,
    }
}

fn invalid(s: &str) -> ParsingError {
    ParsingError::new(format!("Invalid memory string '{}'", s))
}

/// Parse SLURM squeue/scontrol memory format (e.g., "4G", "1000M", "4096").
fn parse_slurm_memory(s: &str) -> Result<u64, ParsingError> {
    let trimmed = s.trim();
    let last = trimmed.chars().last().ok_or_else(|| invalid(s))?;

    let (number, power) = if last.is_ascii_digit() {
        // No unit suffix, assume MB
        (trimmed, 1)
    } else {
        let power = unit_power(last).ok_or_else(|| invalid(s))?;
        (&trimmed[..trimmed.len() - last.len_utf8()], power)
    };

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(s));
    }
    let value: u64 = number.parse().map_err(|_| invalid(s))?;
    value
        .checked_mul(1024u64.pow(power))
        .ok_or_else(|| invalid(s))
}

/// Parse SLURM sacct memory format (e.g., "4Gn", "1000Mc").
fn parse_slurm_sacct_memory(s: &str) -> Result<u64, ParsingError> {
    // sacct memory can have 'n' or 'c' suffix (per node/per core)
    let s = s.trim().trim_end_matches('n').trim_end_matches('c');
    parse_slurm_memory(s)
}

/// Parse LSF memory format (e.g., "4 GB", "1000 MB").
fn parse_lsf_memory(s: &str) -> Result<u64, ParsingError> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let (number, unit) = match parts.as_slice() {
        [number] => split_attached_unit(number),
        [number, unit] => (*number, *unit),
        _ => return Err(invalid(s)),
    };

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(invalid(s));
    }
    let value: f64 = number.parse().map_err(|_| invalid(s))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(s));
    }

    let power = match unit.to_uppercase().as_str() {
        "" => 1,
        "KB" | "K" => 0,
        "MB" | "M" => 1,
        "GB" | "G" => 2,
        "TB" | "T" => 3,
        _ => return Err(invalid(s)),
    };

    Ok((value * 1024f64.powi(power)).round() as u64)
}

fn split_attached_unit(token: &str) -> (&str, &str) {
    let idx = token
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    token.split_at(idx)
}
