//! Line scanner for version-control remote configuration text
//!
//! Architectural Principle: Service Layer - the scanner turns raw configuration text into remote lines
//! - Section headers are tracked so each `url = ` line knows its enclosing remote
//! - Only `url = ` lines matter; `fetch = `, `pushurl = ` and anything else is ignored
//! - Values are handed to `RemoteUrl` for classification

pub mod url;

use lazy_static::lazy_static;
use regex::Regex;

pub use url::{registrable_domain, RemoteUrl};

lazy_static! {
    static ref SECTION_HEADER: Regex = Regex::new(r#"^\s*\[\s*([A-Za-z0-9.-]+)(?:\s+"((?:[^"\\]|\\.)*)")?\s*\]"#)
        .expect("section header pattern is a valid regex");
    static ref URL_LINE: Regex =
        Regex::new(r"(?i)^\s*url\s*=\s*(.*\S)\s*$").expect("url line pattern is a valid regex");
}

/// A `url = ` line found in configuration text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLine<'a> {
    /// Line number (1-indexed)
    pub line_number: u32,
    /// Remote name of the enclosing `[remote "name"]` header; `None` in any other section
    pub section: Option<&'a str>,
    /// Value with surrounding whitespace and quotes removed
    pub value: &'a str,
}

impl<'a> RemoteLine<'a> {
    /// Classify the value of this line
    pub fn remote(&self) -> RemoteUrl<'a> {
        RemoteUrl::parse(self.value)
    }
}

/// Find every `url = ` line in the text, in order of appearance
pub fn remote_lines(config_text: &str) -> Vec<RemoteLine<'_>> {
    let mut section = None;
    let mut lines = Vec::new();

    for (index, line) in config_text.lines().enumerate() {
        if let Some(caps) = SECTION_HEADER.captures(line) {
            section = caps
                .get(2)
                .filter(|_| caps[1].eq_ignore_ascii_case("remote"))
                .map(|m| m.as_str());
            continue;
        }

        if let Some(caps) = URL_LINE.captures(line) {
            let value = caps.get(1).map(|m| unquote(m.as_str())).unwrap_or_default();
            lines.push(RemoteLine {
                line_number: u32::try_from(index + 1).unwrap_or(u32::MAX),
                section,
                value,
            });
        }
    }

    tracing::debug!("Found {} url lines", lines.len());
    lines
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(str::trim)
        .unwrap_or(value)
}
