//! # Record Parser
//!
//! Splits one `<station>;<value>` line into a borrowed key and a finite
//! measurement. Stateless; callers skip lines that fail to parse.

use crate::constants::DELIMITER;
use crate::error::ParseError;

/// One parsed measurement, borrowing its key from the input line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub key: &'a str,
    pub value: f64,
}

/// Parse a single line (without its line terminator)
pub fn parse_record(line: &str) -> Result<Record<'_>, ParseError> {
    let (key, raw_value) = line
        .split_once(DELIMITER)
        .ok_or(ParseError::MissingDelimiter)?;

    if raw_value.contains(DELIMITER) {
        return Err(ParseError::ExtraDelimiter {
            count: line.matches(DELIMITER).count(),
        });
    }

    let value: f64 = raw_value.parse().map_err(|_| ParseError::InvalidValue {
        value: raw_value.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ParseError::NonFiniteValue {
            value: raw_value.to_string(),
        });
    }

    Ok(Record { key, value })
}

/// Parse a raw input line, rejecting bytes that are not UTF-8 text
pub fn parse_record_bytes(line: &[u8]) -> Result<Record<'_>, ParseError> {
    let line = std::str::from_utf8(line).map_err(|e| ParseError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    parse_record(line)
}
