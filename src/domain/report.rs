//! Core domain models for remote scans and their reports
//!
//! Architecture: Rich Domain Models - Remote entries describe what a scan saw without leaking it
//! - RemoteEntry records the classification of one `url = ` line and the value that may be reported
//! - DomainReport acts as an aggregate root over entries collected from many configuration files
//! - Raw URLs and unlisted domains never enter these types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shape of a remote URL as found on a `url = ` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    /// `scheme://[user[:pass]@]host[:port]/path`, including `ssh://`
    Url,
    /// `[user@]host:path`
    ScpLike,
    /// Filesystem path or `file://` URL
    Local,
    /// Nothing we know how to read a host out of
    Unrecognized,
}

impl RemoteKind {
    /// Whether a remote of this kind is a local repository
    pub fn is_local(self) -> bool {
        matches!(self, Self::Local)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::ScpLike => "scp",
            Self::Local => "local",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// One `url = ` line seen during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Configuration file the line came from, when scanning files
    pub source: Option<PathBuf>,
    /// Name of the enclosing section, e.g. `origin` for `[remote "origin"]`
    pub section: Option<String>,
    /// Line number (1-indexed) of the `url = ` line
    pub line_number: u32,
    /// Classification of the value
    pub kind: RemoteKind,
    /// Allow-listed domain, or its mask; `None` for local and unrecognized remotes
    pub reported_domain: Option<String>,
    /// Whether `reported_domain` is the real domain rather than a mask
    pub allowed: bool,
}

impl RemoteEntry {
    /// Create an entry that contributes nothing to the domain list
    pub fn skipped(line_number: u32, kind: RemoteKind) -> Self {
        Self {
            source: None,
            section: None,
            line_number,
            kind,
            reported_domain: None,
            allowed: false,
        }
    }

    /// Create an entry that reports a domain (or its mask)
    pub fn reported(
        line_number: u32,
        kind: RemoteKind,
        domain: impl Into<String>,
        allowed: bool,
    ) -> Self {
        Self {
            source: None,
            section: None,
            line_number,
            kind,
            reported_domain: Some(domain.into()),
            allowed,
        }
    }

    /// Attach the enclosing section name
    pub fn with_section(mut self, section: Option<String>) -> Self {
        self.section = section;
        self
    }

    /// Attach the file this entry was read from
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether this entry was masked
    pub fn is_masked(&self) -> bool {
        self.reported_domain.is_some() && !self.allowed
    }

    /// Format entry for display
    pub fn format_display(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map(|p| format!("{}:", p.display()))
            .unwrap_or_default();
        let section = self.section.as_deref().unwrap_or("-");

        match &self.reported_domain {
            Some(domain) => format!(
                "{}{} [{}] {} {}",
                source,
                self.line_number,
                section,
                self.kind.as_str(),
                domain
            ),
            None => format!(
                "{}{} [{}] {} (no domain)",
                source,
                self.line_number,
                section,
                self.kind.as_str()
            ),
        }
    }
}

/// Summary statistics for a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Configuration files read
    pub total_files: usize,
    /// `url = ` lines seen
    pub total_remotes: usize,
    /// Remotes reported verbatim
    pub allowed: usize,
    /// Remotes reported as a mask
    pub masked: usize,
    /// Local or unrecognized remotes (nothing reported)
    pub skipped: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    /// When the scan ran
    pub scanned_at: DateTime<Utc>,
}

impl ScanSummary {
    fn count(&mut self, entry: &RemoteEntry) {
        self.total_remotes += 1;
        match (&entry.reported_domain, entry.allowed) {
            (Some(_), true) => self.allowed += 1,
            (Some(_), false) => self.masked += 1,
            (None, _) => self.skipped += 1,
        }
    }

    /// Number of entries that contributed to the domain list
    pub fn reported(&self) -> usize {
        self.allowed + self.masked
    }
}

/// Result of scanning one or more configuration texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReport {
    /// Every `url = ` line seen, in scan order
    pub entries: Vec<RemoteEntry>,
    /// Summary statistics
    pub summary: ScanSummary,
    /// Fingerprint of the configuration used for the scan
    pub config_fingerprint: Option<String>,
}

impl DomainReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            summary: ScanSummary {
                scanned_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    /// Add an entry to the report
    pub fn add_entry(&mut self, entry: RemoteEntry) {
        self.summary.count(&entry);
        self.entries.push(entry);
    }

    /// Reported domains in scan order
    pub fn domains(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| e.reported_domain.clone())
            .collect()
    }

    /// Set the number of files scanned
    pub fn set_files_scanned(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    /// Set the execution time
    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    /// Set the configuration fingerprint
    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }
}

impl Default for DomainReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur while locating, reading or configuring a scan
///
/// Extraction itself never fails; malformed remotes degrade to "no domain".
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Configuration file could not be read as text
    #[error("Read error in {file}: {message}")]
    Read { file: String, message: String },

    /// No repository configuration could be found for a path
    #[error("Discovery error in {path}: {message}")]
    Discovery { path: String, message: String },
}

impl ScanError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a read error
    pub fn read(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a discovery error
    pub fn discovery(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;
