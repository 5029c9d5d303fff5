//! Scan orchestration over configuration files
//!
//! CDD Principle: Domain Services - Scanner orchestrates discovery, reading and extraction
//! - Coordinates repository discovery, file reading and domain extraction
//! - Provides a clean interface for scanning single texts, files or directory trees
//! - Handles parallel processing and error recovery gracefully

use crate::config::ScannerConfig;
use crate::discovery::{discover, DiscoveryOptions};
use crate::domain::{DomainReport, RemoteEntry, ScanError, ScanResult};
use crate::extractor::RemoteDomainExtractor;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Options for customizing scan behavior
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to read and scan files in parallel
    pub parallel: bool,
    /// Whether to stop at the first unreadable file
    pub fail_fast: bool,
    /// How paths are turned into configuration files
    pub discovery: DiscoveryOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_fast: false,
            discovery: DiscoveryOptions::default(),
        }
    }
}

/// Scans configuration files and builds domain reports
pub struct Scanner {
    config: ScannerConfig,
    extractor: RemoteDomainExtractor,
}

impl Scanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScannerConfig) -> ScanResult<Self> {
        config.validate()?;
        let extractor = RemoteDomainExtractor::from_config(&config);
        Ok(Self { config, extractor })
    }

    /// Create a scanner with default configuration
    pub fn with_defaults() -> ScanResult<Self> {
        Self::new(ScannerConfig::default())
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn extractor(&self) -> &RemoteDomainExtractor {
        &self.extractor
    }

    /// Scan options derived from the configuration
    pub fn default_options(&self) -> ScanOptions {
        ScanOptions {
            discovery: DiscoveryOptions::from(&self.config.discovery),
            ..Default::default()
        }
    }

    /// Scan configuration text that did not come from a file
    pub fn scan_text(&self, config_text: &str) -> DomainReport {
        let start_time = Instant::now();
        let mut report = DomainReport::new();

        for entry in self.extractor.scan(config_text) {
            report.add_entry(entry);
        }

        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        report
    }

    /// Scan a single configuration file
    pub fn scan_file<P: AsRef<Path>>(&self, file_path: P) -> ScanResult<Vec<RemoteEntry>> {
        let file_path = file_path.as_ref();

        let bytes = fs::read(file_path).map_err(|e| {
            ScanError::read(file_path.display().to_string(), format!("Failed to read file: {e}"))
        })?;
        // Config files are bytes; invalid sequences only spoil the lines they sit on
        let content = String::from_utf8_lossy(&bytes);
        let entries = self
            .extractor
            .scan(&content)
            .into_iter()
            .map(|entry| entry.with_source(file_path))
            .collect();

        Ok(entries)
    }

    /// Discover configuration files under the given paths and scan them
    pub fn scan_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &ScanOptions,
    ) -> ScanResult<DomainReport> {
        let start_time = Instant::now();
        let files = discover(paths, &options.discovery)?;

        let results = if options.parallel && files.len() > 1 {
            files.par_iter().map(|file| (file, self.scan_file(file))).collect::<Vec<_>>()
        } else {
            files.iter().map(|file| (file, self.scan_file(file))).collect::<Vec<_>>()
        };

        let mut report = DomainReport::new();
        let mut files_scanned = 0;

        // Results keep discovery order regardless of how they were produced
        for (file_path, result) in results {
            match result {
                Ok(entries) => {
                    files_scanned += 1;
                    for entry in entries {
                        report.add_entry(entry);
                    }
                }
                Err(e) => {
                    if options.fail_fast {
                        return Err(e);
                    }
                    tracing::warn!("Failed to scan {}: {}", file_path.display(), e);
                }
            }
        }

        report.set_files_scanned(files_scanned);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());

        Ok(report)
    }
}
