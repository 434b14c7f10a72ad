//! Memory size strings understood by the host binary's `-g` flag.
//!
//! The host accepts a decimal byte count with an optional `K` (KiB) or `M`
//! (MiB) suffix. Anything else is read by the host as a truncated number, so
//! the harness rejects it before launching anything.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Largest per-DPU footprint the host honours; larger requests fall back to this.
pub const HOST_MAX_MEMORY_BYTES: u64 = 32 * MB;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemorySize {
    text: String,
    bytes: u64,
}

impl MemorySize {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let text = input.trim();
        let invalid = || ConfigError::MemorySize(input.to_string());

        let (digits, factor) = match text.as_bytes().last() {
            Some(b'K') => (&text[..text.len() - 1], KB),
            Some(b'M') => (&text[..text.len() - 1], MB),
            Some(_) => (text, 1),
            None => return Err(invalid()),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let count: u64 = digits.parse().map_err(|_| invalid())?;
        let bytes = count.checked_mul(factor).ok_or_else(invalid)?;
        if bytes == 0 {
            return Err(invalid());
        }

        Ok(Self {
            text: text.to_string(),
            bytes,
        })
    }

    /// The string handed to the host, exactly as given.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn exceeds_host_limit(&self) -> bool {
        self.bytes > HOST_MAX_MEMORY_BYTES
    }
}

impl Default for MemorySize {
    fn default() -> Self {
        Self {
            text: "32M".to_string(),
            bytes: HOST_MAX_MEMORY_BYTES,
        }
    }
}

impl FromStr for MemorySize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(MemorySize::parse("32M").unwrap().bytes(), 32 * 1024 * 1024);
        assert_eq!(MemorySize::parse("512K").unwrap().bytes(), 512 * 1024);
        assert_eq!(MemorySize::parse("4096").unwrap().bytes(), 4096);
    }

    #[test]
    fn test_parse_keeps_text() {
        let size = MemorySize::parse(" 16M ").unwrap();
        assert_eq!(size.as_str(), "16M");
        assert_eq!(size.to_string(), "16M");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "M", "abc", "32m", "32G", "-1M", "1.5M", "0", "0K"] {
            assert!(
                MemorySize::parse(input).is_err(),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_host_limit() {
        assert!(!MemorySize::parse("32M").unwrap().exceeds_host_limit());
        assert!(MemorySize::parse("33M").unwrap().exceeds_host_limit());
        assert!(!MemorySize::default().exceeds_host_limit());
    }

    #[test]
    fn test_default_matches_host_default() {
        let size = MemorySize::default();
        assert_eq!(size, MemorySize::parse("32M").unwrap());
    }
}
