//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - DomainReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Only reported values are rendered; raw remote URLs are never part of a report

use crate::domain::{DomainReport, RemoteEntry, ScanError, ScanResult};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Supported output formats for domain reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format grouped by configuration file
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// One reported domain per line
    Plain,
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to list local and unrecognized remotes (human and JSON formats)
    pub show_skipped: bool,
    /// Whether to append the summary line (human format)
    pub show_summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_skipped: false,
            show_summary: true,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a domain report in the specified format
    pub fn format_report(&self, report: &DomainReport, format: OutputFormat) -> ScanResult<String> {
        let entries = self.filter_entries(&report.entries);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &entries)),
            OutputFormat::Json => self.format_json(report, &entries),
            OutputFormat::Plain => Ok(self.format_plain(report)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &DomainReport,
        format: OutputFormat,
        mut writer: W,
    ) -> ScanResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn filter_entries<'a>(&self, entries: &'a [RemoteEntry]) -> Vec<&'a RemoteEntry> {
        entries
            .iter()
            .filter(|e| self.options.show_skipped || e.reported_domain.is_some())
            .collect()
    }

    /// Format report in human-readable format
    fn format_human(&self, report: &DomainReport, entries: &[&RemoteEntry]) -> String {
        let mut output = String::new();

        if entries.is_empty() {
            output.push_str(&self.paint("No remote domains found\n", "2"));
        } else {
            output.push_str(&self.paint("Remote Domains\n\n", "1"));

            // Group by source, keeping text scans under a single heading
            let mut by_source: BTreeMap<Option<&Path>, Vec<&RemoteEntry>> = BTreeMap::new();
            for entry in entries {
                by_source.entry(entry.source.as_deref()).or_default().push(entry);
            }

            for (source, source_entries) in by_source {
                match source {
                    Some(path) => output.push_str(&format!("{}\n", path.display())),
                    None => output.push_str("<text>\n"),
                }

                for entry in source_entries {
                    let section = entry.section.as_deref().unwrap_or("-");
                    let location = self.paint(&format!("{}:{}", entry.line_number, section), "2");
                    let value = match &entry.reported_domain {
                        Some(domain) if entry.allowed => self.paint(domain, "32"),
                        Some(domain) => self.paint(&format!("{domain} (masked)"), "33"),
                        None => self.paint(&format!("({} remote, no domain)", entry.kind.as_str()), "2"),
                    };
                    output.push_str(&format!(
                        "  {} [{}] {}\n",
                        location,
                        entry.kind.as_str(),
                        value
                    ));
                }
                output.push('\n');
            }
        }

        if self.options.show_summary {
            output.push_str(&self.format_summary(report));
        }

        output
    }

    /// Format report in JSON format
    fn format_json(&self, report: &DomainReport, entries: &[&RemoteEntry]) -> ScanResult<String> {
        let json_entries: Vec<JsonValue> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "source": e.source.as_ref().map(|p| p.display().to_string()),
                    "section": e.section,
                    "line_number": e.line_number,
                    "kind": e.kind,
                    "domain": e.reported_domain,
                    "allowed": e.allowed
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "domains": report.domains(),
            "remotes": json_entries,
            "summary": {
                "total_files": report.summary.total_files,
                "total_remotes": report.summary.total_remotes,
                "reported": report.summary.reported(),
                "allowed": report.summary.allowed,
                "masked": report.summary.masked,
                "skipped": report.summary.skipped,
                "execution_time_ms": report.summary.execution_time_ms,
                "scanned_at": report.summary.scanned_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| ScanError::config(format!("JSON serialization failed: {e}")))
    }

    /// One reported domain per line, in scan order
    fn format_plain(&self, report: &DomainReport) -> String {
        report.domains().iter().map(|d| format!("{d}\n")).collect()
    }

    /// Format the summary section
    fn format_summary(&self, report: &DomainReport) -> String {
        let summary = &report.summary;
        let execution_time = (summary.execution_time_ms as f64) / 1000.0;

        let mut parts = vec![self.paint(&format!("{} allowed", summary.allowed), "32")];
        if summary.masked > 0 {
            parts.push(self.paint(&format!("{} masked", summary.masked), "33"));
        }
        if summary.skipped > 0 {
            parts.push(format!("{} skipped", summary.skipped));
        }

        format!(
            "{} {} across {} remote{} in {} file{} ({:.1}s)\n",
            self.paint("Summary:", "1"),
            parts.join(", "),
            summary.total_remotes,
            if summary.total_remotes == 1 { "" } else { "s" },
            summary.total_files,
            if summary.total_files == 1 { "" } else { "s" },
            execution_time
        )
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.options.use_colors {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RemoteKind;
    use std::path::PathBuf;

    fn create_test_report() -> DomainReport {
        let mut report = DomainReport::new();
        let source = PathBuf::from("repo/.git/config");

        report.add_entry(
            RemoteEntry::reported(5, RemoteKind::Url, "github.com", true)
                .with_section(Some("origin".to_string()))
                .with_source(&source),
        );
        report.add_entry(
            RemoteEntry::reported(8, RemoteKind::ScpLike, "aaaaaa.aaa", false)
                .with_section(Some("corp".to_string()))
                .with_source(&source),
        );
        report.add_entry(RemoteEntry::skipped(11, RemoteKind::Local).with_source(&source));

        report.set_files_scanned(1);
        report.set_execution_time(1200);
        report
    }

    fn plain_formatter() -> ReportFormatter {
        ReportFormatter::new(ReportOptions {
            use_colors: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_human_format() {
        let output = plain_formatter()
            .format_report(&create_test_report(), OutputFormat::Human)
            .unwrap();

        assert!(output.contains("Remote Domains"));
        assert!(output.contains("repo/.git/config"));
        assert!(output.contains("5:origin [url] github.com"));
        assert!(output.contains("aaaaaa.aaa (masked)"));
        assert!(!output.contains("no domain"));
        assert!(output.contains("Summary: 1 allowed, 1 masked, 1 skipped across 3 remotes in 1 file"));
    }

    #[test]
    fn test_human_format_with_skipped() {
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            show_skipped: true,
            show_summary: false,
        });
        let output = formatter.format_report(&create_test_report(), OutputFormat::Human).unwrap();

        assert!(output.contains("11:- [local] (local remote, no domain)"));
        assert!(!output.contains("Summary:"));
    }

    #[test]
    fn test_colors() {
        let output = ReportFormatter::default()
            .format_report(&create_test_report(), OutputFormat::Human)
            .unwrap();
        assert!(output.contains("\x1b[32mgithub.com\x1b[0m"));
    }

    #[test]
    fn test_json_format() {
        let output = ReportFormatter::default()
            .format_report(&create_test_report(), OutputFormat::Json)
            .unwrap();

        let json: JsonValue = serde_json::from_str(&output).unwrap();
        assert_eq!(json["domains"], serde_json::json!(["github.com", "aaaaaa.aaa"]));
        assert_eq!(json["remotes"].as_array().unwrap().len(), 2);
        assert_eq!(json["remotes"][0]["kind"], "url");
        assert_eq!(json["remotes"][1]["kind"], "scp_like");
        assert_eq!(json["remotes"][1]["allowed"], false);
        assert_eq!(json["summary"]["total_files"], 1);
        assert_eq!(json["summary"]["skipped"], 1);
        assert_eq!(json["summary"]["reported"], 2);
    }

    #[test]
    fn test_plain_format() {
        let output = plain_formatter()
            .format_report(&create_test_report(), OutputFormat::Plain)
            .unwrap();
        assert_eq!(output, "github.com\naaaaaa.aaa\n");
    }

    #[test]
    fn test_empty_report() {
        let report = DomainReport::new();
        let output = plain_formatter().format_report(&report, OutputFormat::Human).unwrap();
        assert!(output.contains("No remote domains found"));

        let plain = plain_formatter().format_report(&report, OutputFormat::Plain).unwrap();
        assert!(plain.is_empty());
    }

    #[test]
    fn test_write_report() {
        let mut buffer = Vec::new();
        plain_formatter()
            .write_report(&create_test_report(), OutputFormat::Plain, &mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "github.com\naaaaaa.aaa\n");
    }
}
