//! Allow-list of domains that may be reported verbatim

use crate::domain::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Second-level domains of widely used hosting services
pub const WELL_KNOWN_DOMAINS: &[&str] = &[
    "github.com",
    "bitbucket.org",
    "visualstudio.com",
    "gitlab.com",
    "heroku.com",
    "azurewebsites.net",
    "ibm.com",
    "amazon.com",
    "amazonaws.com",
    "cloudapp.net",
    "rhcloud.com",
    "google.com",
];

/// Set of domains that may be reported verbatim.
///
/// Membership is exact, case-sensitive string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    domains: BTreeSet<String>,
}

impl AllowList {
    /// Create an empty allow-list
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow-list of well-known hosting services
    pub fn well_known() -> Self {
        WELL_KNOWN_DOMAINS.iter().copied().collect()
    }

    /// Load an allow-list from a text file, one domain per line.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ScanResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            ScanError::config(format!(
                "Failed to read allow-list file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(Self::parse(&contents))
    }

    /// Parse allow-list text, one domain per line
    pub fn parse(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Add a domain
    pub fn insert(&mut self, domain: impl Into<String>) -> bool {
        self.domains.insert(domain.into())
    }

    /// Whether the domain may be reported verbatim
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Domains in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for AllowList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.domains.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exact_membership() {
        let allow: AllowList = ["github.com", "example.com"].into_iter().collect();

        assert!(allow.contains("github.com"));
        assert!(!allow.contains("GitHub.com"));
        assert!(!allow.contains("git.example.com"));
        assert_eq!(allow.len(), 2);
    }

    #[test]
    fn test_well_known() {
        let allow = AllowList::well_known();
        assert!(allow.contains("github.com"));
        assert!(allow.contains("gitlab.com"));
        assert_eq!(allow.len(), WELL_KNOWN_DOMAINS.len());
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let allow = AllowList::parse("# hosts\ngithub.com\n\n  gitlab.com  \n#example.com\n");
        assert_eq!(allow.iter().collect::<Vec<_>>(), vec!["github.com", "gitlab.com"]);
    }

    #[test]
    fn test_load_from_file() -> ScanResult<()> {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("allow.txt");
        fs::write(&path, "server.org\nserver2.org\n")?;

        let allow = AllowList::load_from_file(&path)?;
        assert!(allow.contains("server2.org"));

        assert!(AllowList::load_from_file(temp_dir.path().join("missing.txt")).is_err());
        Ok(())
    }

    #[test]
    fn test_extend() {
        let mut allow = AllowList::new();
        assert!(allow.is_empty());
        allow.extend(vec!["a.com".to_string()]);
        assert!(allow.insert("b.com"));
        assert!(!allow.insert("a.com"));
        assert_eq!(allow.len(), 2);
    }
}
