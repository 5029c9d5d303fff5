//! Remote domain extraction
//!
//! CDD Principle: Domain Services - the extractor reduces configuration text to reportable domains
//! - Each `url = ` line is classified and reduced to its registrable domain
//! - Domains outside the allow-list are masked before they leave this module
//! - Local and unrecognized remotes contribute nothing, not even a mask

pub mod allow_list;

use crate::config::ScannerConfig;
use crate::domain::RemoteEntry;
use crate::remote::remote_lines;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use allow_list::{AllowList, WELL_KNOWN_DOMAINS};

/// Placeholder reported for domains outside the allow-list
pub const DEFAULT_PLACEHOLDER: &str = "aaaaaa.aaa";

/// How domains outside the allow-list are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStyle {
    /// Report a fixed placeholder
    #[default]
    Placeholder,
    /// Replace every character except `.` with `a`
    PreserveShape,
}

/// Extracts allow-listed remote domains from configuration text
#[derive(Debug, Clone)]
pub struct RemoteDomainExtractor {
    allow_list: AllowList,
    masking: MaskStyle,
    placeholder: String,
    unique: bool,
}

impl RemoteDomainExtractor {
    /// Create an extractor with the default placeholder mask
    pub fn new(allow_list: AllowList) -> Self {
        Self {
            allow_list,
            masking: MaskStyle::Placeholder,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            unique: false,
        }
    }

    /// Create an extractor from a scanner configuration
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            allow_list: config.allow_list.clone(),
            masking: config.masking,
            placeholder: config.placeholder.clone(),
            unique: config.unique,
        }
    }

    /// Set how unlisted domains are masked
    pub fn with_masking(mut self, masking: MaskStyle) -> Self {
        self.masking = masking;
        self
    }

    /// Set the placeholder used by `MaskStyle::Placeholder`
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Report each domain only at its first occurrence
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Reported domains, one per `url = ` line that has a host, in scan order
    pub fn extract_domains(&self, config_text: &str) -> Vec<String> {
        self.scan(config_text)
            .into_iter()
            .filter_map(|entry| entry.reported_domain)
            .collect()
    }

    /// Classify every `url = ` line, local and unrecognized ones included
    pub fn scan(&self, config_text: &str) -> Vec<RemoteEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for line in remote_lines(config_text) {
            let remote = line.remote();
            let kind = remote.kind();
            let section = line.section.map(str::to_string);

            let domain = match remote.domain() {
                Some(domain) => domain,
                None => {
                    tracing::debug!("Line {}: {} remote, no domain", line.line_number, kind.as_str());
                    entries.push(RemoteEntry::skipped(line.line_number, kind).with_section(section));
                    continue;
                }
            };

            if self.unique && !seen.insert(domain) {
                tracing::debug!("Line {}: domain already reported", line.line_number);
                entries.push(RemoteEntry::skipped(line.line_number, kind).with_section(section));
                continue;
            }

            let allowed = self.allow_list.contains(domain);
            let reported = if allowed {
                domain.to_string()
            } else {
                self.mask(domain)
            };
            tracing::debug!(
                "Line {}: {} remote, reporting {}",
                line.line_number,
                kind.as_str(),
                reported
            );

            entries.push(
                RemoteEntry::reported(line.line_number, kind, reported, allowed)
                    .with_section(section),
            );
        }

        entries
    }

    fn mask(&self, domain: &str) -> String {
        match self.masking {
            MaskStyle::Placeholder => self.placeholder.clone(),
            MaskStyle::PreserveShape => {
                domain.chars().map(|c| if c == '.' { '.' } else { 'a' }).collect()
            }
        }
    }
}

impl Default for RemoteDomainExtractor {
    fn default() -> Self {
        Self::new(AllowList::well_known())
    }
}
