//! Configuration loading and management for remote domain scans
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - The default allow-list is embedded in the domain, not infrastructure
//! - Configuration acts as a repository for masking and discovery settings

use crate::domain::{ScanError, ScanResult};
use crate::extractor::{AllowList, MaskStyle, DEFAULT_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File names looked up in the working directory when no config is given
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["remote_domains.yaml", "remote_domains.yml", ".remote_domains.yaml"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Configuration format version
    pub version: String,
    /// Domains reported verbatim
    #[serde(default = "AllowList::well_known")]
    pub allow_list: AllowList,
    /// How domains outside the allow-list are reported
    #[serde(default)]
    pub masking: MaskStyle,
    /// Placeholder for `masking: placeholder`
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Report each domain only once per configuration text
    #[serde(default)]
    pub unique: bool,
    /// Repository discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Repository discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Walk directories looking for `.git/config`
    #[serde(default)]
    pub recursive: bool,
    /// Maximum directory depth for recursive discovery
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: default_max_depth(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ScanResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            ScanError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            ScanError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> ScanResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ScanError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first default config file found in `dir`, or the defaults
    pub fn discover_in<P: AsRef<Path>>(dir: P) -> ScanResult<Self> {
        for name in DEFAULT_CONFIG_FILES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                tracing::debug!("Using config file {}", candidate.display());
                return Self::load_from_file(candidate);
            }
        }
        Ok(Self::default())
    }

    /// Get default configuration with the well-known allow-list
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            allow_list: AllowList::well_known(),
            masking: MaskStyle::Placeholder,
            placeholder: default_placeholder(),
            unique: false,
            discovery: DiscoveryConfig::default(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> ScanResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(ScanError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        if self.placeholder.trim().is_empty() {
            return Err(ScanError::config("Placeholder must not be empty"));
        }

        for domain in self.allow_list.iter() {
            if domain.is_empty()
                || domain.chars().any(|c| c.is_whitespace() || c == '/' || c == '@')
            {
                return Err(ScanError::config(format!(
                    "Invalid allow-list entry '{domain}': expected a bare domain such as example.com"
                )));
            }
        }

        if self.discovery.max_depth == 0 {
            return Err(ScanError::config("discovery.max_depth must be at least 1"));
        }

        Ok(())
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> ScanResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the settings that affect scan output
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        // AllowList iterates in sorted order
        self.allow_list.len().hash(&mut hasher);
        for domain in self.allow_list.iter() {
            domain.hash(&mut hasher);
        }
        self.masking.hash(&mut hasher);
        self.placeholder.hash(&mut hasher);
        self.unique.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_max_depth() -> usize {
    4
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: ScannerConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: ScannerConfig::default() }
    }

    /// Replace the allow-list
    pub fn allow_list(mut self, allow_list: AllowList) -> Self {
        self.config.allow_list = allow_list;
        self
    }

    /// Add a domain to the allow-list
    pub fn allow(mut self, domain: impl Into<String>) -> Self {
        self.config.allow_list.insert(domain);
        self
    }

    /// Set the masking style
    pub fn masking(mut self, masking: MaskStyle) -> Self {
        self.config.masking = masking;
        self
    }

    /// Set the placeholder
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    /// Report each domain only once
    pub fn unique(mut self, unique: bool) -> Self {
        self.config.unique = unique;
        self
    }

    /// Enable recursive discovery with the given depth
    pub fn recursive(mut self, max_depth: usize) -> Self {
        self.config.discovery.recursive = true;
        self.config.discovery.max_depth = max_depth;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ScanResult<ScannerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
