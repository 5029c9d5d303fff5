//! Locating repository configuration files
//!
//! Architectural Principle: Service Layer - discovery turns user paths into configuration files
//! - A regular file is taken as configuration text as-is
//! - A working tree yields `.git/config`; a bare repository yields `config`
//! - Recursive discovery walks a directory tree for `.git/config`

use crate::config::DiscoveryConfig;
use crate::domain::{ScanError, ScanResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options for locating configuration files
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Walk directories looking for `.git/config`
    pub recursive: bool,
    /// Maximum directory depth when walking
    pub max_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            recursive: config.recursive,
            max_depth: config.max_depth,
        }
    }
}

/// Find configuration files for the given paths.
///
/// The result is sorted and free of duplicates. A path that yields nothing is
/// an error.
pub fn discover<P: AsRef<Path>>(paths: &[P], options: &DiscoveryOptions) -> ScanResult<Vec<PathBuf>> {
    let mut found = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let configs = discover_one(path, options)?;
        if configs.is_empty() {
            return Err(ScanError::discovery(
                path.display().to_string(),
                "no repository configuration found",
            ));
        }
        found.extend(configs);
    }

    found.sort();
    found.dedup();
    Ok(found)
}

fn discover_one(path: &Path, options: &DiscoveryOptions) -> ScanResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(ScanError::discovery(path.display().to_string(), "path does not exist"));
    }

    if let Some(config) = repository_config(path) {
        tracing::debug!("Found repository config {}", config.display());
        if !options.recursive {
            return Ok(vec![config]);
        }
    } else if !options.recursive {
        return Ok(Vec::new());
    }

    let mut configs = Vec::new();
    let walker = WalkDir::new(path)
        .follow_links(false)
        .max_depth(options.max_depth)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", path.display(), e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            if let Some(config) = repository_config(entry.path()) {
                tracing::debug!("Found repository config {}", config.display());
                configs.push(config);
            }
        }
    }

    Ok(configs)
}

/// Configuration file of the repository rooted at `dir`, if any
pub fn repository_config(dir: &Path) -> Option<PathBuf> {
    let work_tree = dir.join(".git").join("config");
    if work_tree.is_file() {
        return Some(work_tree);
    }

    // Bare repository, or the `.git` directory itself
    let bare = dir.join("config");
    if bare.is_file() && dir.join("HEAD").is_file() {
        return Some(bare);
    }

    None
}
