//! YAML-style payloads
//!
//! `stats*` replies carry a flat `key: value` mapping and `list-tubes*`
//! replies a `- item` sequence, both behind a `---` document header.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, TubeError};

const DOCUMENT_HEADER: &str = "---\n";

/// A single statistics value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(u64),
    Str(String),
}

impl StatValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            StatValue::Int(n) => Some(*n),
            StatValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatValue::Int(_) => None,
            StatValue::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Int(n) => write!(f, "{}", n),
            StatValue::Str(s) => f.write_str(s),
        }
    }
}

/// Statistics keyed by name (`current-jobs-ready`, `state`, ...)
pub type Stats = BTreeMap<String, StatValue>;

/// Parse a `stats`, `stats-job` or `stats-tube` payload
pub fn parse_stats(data: &[u8]) -> Result<Stats> {
    let text = strip_header(data)?;

    let mut stats = Stats::new();
    for line in text.lines().filter(|l| !l.is_empty()) {
        let (key, value) = line
            .split_once(": ")
            .ok_or_else(|| TubeError::Framing(format!("malformed stats line {:?}", line)))?;
        let value = match value.parse::<u64>() {
            Ok(n) => StatValue::Int(n),
            Err(_) => StatValue::Str(strip_quotes(value).to_string()),
        };
        stats.insert(key.to_string(), value);
    }
    Ok(stats)
}

/// Parse a `list-tubes` or `list-tubes-watched` payload
pub fn parse_list(data: &[u8]) -> Result<Vec<String>> {
    let text = strip_header(data)?;

    text.lines()
        .filter(|l| !l.is_empty())
        .map(|line| {
            line.strip_prefix("- ")
                .map(str::to_string)
                .ok_or_else(|| TubeError::Framing(format!("malformed list line {:?}", line)))
        })
        .collect()
}

fn strip_header(data: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(data)
        .map_err(|_| TubeError::Framing("YAML payload is not valid UTF-8".to_string()))?;
    text.strip_prefix(DOCUMENT_HEADER)
        .ok_or_else(|| TubeError::Framing("YAML payload missing '---' header".to_string()))
}

fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
