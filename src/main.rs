//! Remote Domains CLI - Command-line interface for remote domain reporting
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to scanner operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output
//! - Provides clean separation between user interface and extraction logic

use clap::{Parser, Subcommand, ValueEnum};
use remote_domains::{
    AllowList, MaskStyle, OutputFormat, ReportFormatter, ReportOptions, ScanError, ScanOptions,
    ScanResult, Scanner, ScannerConfig,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

/// Remote Domains - report the hosting domains of version-control remotes
#[derive(Parser)]
#[command(name = "remote-domains")]
#[command(version)]
#[command(about = "Report the domains of version-control remotes, masking any not on an allow-list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan repositories or configuration files for remote domains
    Scan {
        /// Repositories, bare repositories or configuration files (defaults to .)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        #[command(flatten)]
        allow: AllowArgs,

        /// Walk directories looking for repositories
        #[arg(short, long)]
        recursive: bool,

        /// Maximum directory depth for --recursive
        #[arg(long)]
        max_depth: Option<usize>,

        /// Report each domain only once
        #[arg(long)]
        unique: bool,

        /// Mask unlisted domains letter by letter instead of with a placeholder
        #[arg(long)]
        preserve_shape: bool,

        /// List local and unrecognized remotes too
        #[arg(long)]
        show_skipped: bool,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Fail on the first unreadable file
        #[arg(long)]
        fail_fast: bool,
    },

    /// Extract domains from configuration text (file or stdin), one per line
    Extract {
        /// Configuration file to read (defaults to stdin)
        file: Option<PathBuf>,

        #[command(flatten)]
        allow: AllowArgs,
    },

    /// Print the effective allow-list
    AllowList {
        #[command(flatten)]
        allow: AllowArgs,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(clap::Args, Default)]
struct AllowArgs {
    /// Additional allow-listed domain
    #[arg(long = "allow", action = clap::ArgAction::Append)]
    domains: Vec<String>,

    /// File with additional allow-listed domains, one per line
    #[arg(long)]
    allow_file: Option<PathBuf>,

    /// Start from an empty allow-list instead of the configured one
    #[arg(long)]
    no_default_allow: bool,
}

impl AllowArgs {
    fn apply(&self, config: &mut ScannerConfig) -> ScanResult<()> {
        if self.no_default_allow {
            config.allow_list = AllowList::new();
        }
        if let Some(path) = &self.allow_file {
            config.allow_list.extend(AllowList::load_from_file(path)?.iter().map(str::to_string));
        }
        config.allow_list.extend(self.domains.iter().cloned());
        config.validate()
    }
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> ScanResult<i32> {
    let use_colors = !cli.no_color;

    match cli.command {
        Commands::Scan {
            paths,
            format,
            allow,
            recursive,
            max_depth,
            unique,
            preserve_shape,
            show_skipped,
            no_parallel,
            fail_fast,
        } => {
            let mut config = load_config(cli.config)?;
            allow.apply(&mut config)?;
            if recursive {
                config.discovery.recursive = true;
            }
            if let Some(depth) = max_depth {
                config.discovery.max_depth = depth;
            }
            if unique {
                config.unique = true;
            }
            if preserve_shape {
                config.masking = MaskStyle::PreserveShape;
            }

            let report_options = ReportOptions {
                use_colors,
                show_skipped,
                ..Default::default()
            };
            run_scan(config, paths, format, report_options, !no_parallel, fail_fast)
        }
        Commands::Extract { file, allow } => {
            let mut config = load_config(cli.config)?;
            allow.apply(&mut config)?;

            let bytes = match file {
                Some(path) => std::fs::read(&path).map_err(|e| {
                    ScanError::read(path.display().to_string(), format!("Failed to read file: {e}"))
                })?,
                None => {
                    let mut bytes = Vec::new();
                    io::stdin().read_to_end(&mut bytes)?;
                    bytes
                }
            };

            for domain in run_extract(config, &bytes)? {
                println!("{domain}");
            }
            Ok(0)
        }
        Commands::AllowList { allow } => {
            let mut config = load_config(cli.config)?;
            allow.apply(&mut config)?;

            for domain in config.allow_list.iter() {
                println!("{domain}");
            }
            Ok(0)
        }
        Commands::ValidateConfig { config_file } => run_validate_config(config_file.or(cli.config)),
    }
}

/// Load the given config file, or look for a default one in the working directory
fn load_config(config_path: Option<PathBuf>) -> ScanResult<ScannerConfig> {
    match config_path {
        Some(path) => ScannerConfig::load_from_file(path),
        None => ScannerConfig::discover_in("."),
    }
}

fn run_scan(
    config: ScannerConfig,
    paths: Vec<PathBuf>,
    format: OutputFormatArg,
    report_options: ReportOptions,
    parallel: bool,
    fail_fast: bool,
) -> ScanResult<i32> {
    let scanner = Scanner::new(config)?;

    // Use current directory if no paths specified
    let paths = if paths.is_empty() { vec![PathBuf::from(".")] } else { paths };

    let options = ScanOptions {
        parallel,
        fail_fast,
        ..scanner.default_options()
    };

    let report = scanner.scan_paths(&paths, &options)?;

    let formatter = ReportFormatter::new(report_options);
    print!("{}", formatter.format_report(&report, format.into())?);

    Ok(0)
}

fn run_extract(config: ScannerConfig, bytes: &[u8]) -> ScanResult<Vec<String>> {
    let scanner = Scanner::new(config)?;
    let report = scanner.scan_text(&String::from_utf8_lossy(bytes));
    Ok(report.domains())
}

fn run_validate_config(config_path: Option<PathBuf>) -> ScanResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("remote_domains.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match ScannerConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("  Allow-listed domains: {}", config.allow_list.len());
            println!("  Masking: {:?}", config.masking);
            println!("  Fingerprint: {}", config.fingerprint());
            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {}", e);
            Ok(1)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_remote(url: &str) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(".git")).unwrap();
        fs::write(
            temp_dir.path().join(".git/config"),
            format!("[remote \"origin\"]\n\turl = {url}\n"),
        )
        .unwrap();
        temp_dir
    }

    #[test]
    fn test_scan_command() {
        let repo = repo_with_remote("git@github.com:x/y.git");

        let result = run_scan(
            ScannerConfig::default(),
            vec![repo.path().to_path_buf()],
            OutputFormatArg::Json,
            ReportOptions::default(),
            true,
            false,
        );
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_scan_command_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let result = run_scan(
            ScannerConfig::default(),
            vec![temp_dir.path().join("missing")],
            OutputFormatArg::Plain,
            ReportOptions::default(),
            false,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_with_allow_args() {
        let mut config = ScannerConfig::default();
        let allow = AllowArgs {
            domains: vec!["server.org".to_string()],
            no_default_allow: true,
            ..Default::default()
        };
        allow.apply(&mut config).unwrap();

        let text = b"url = ssh://user@git.server.org/p.git\nurl = git@github.com:x.git\n";
        assert_eq!(run_extract(config, text).unwrap(), vec!["server.org", "aaaaaa.aaa"]);
    }

    #[test]
    fn test_extract_tolerates_invalid_utf8() {
        let text = b"[user]\n\tname = Jos\xe9\n[remote \"origin\"]\n\turl = https://github.com/x/y.git\n";
        assert_eq!(run_extract(ScannerConfig::default(), text).unwrap(), vec!["github.com"]);
    }

    #[test]
    fn test_allow_file() {
        let temp_dir = TempDir::new().unwrap();
        let allow_file = temp_dir.path().join("allow.txt");
        fs::write(&allow_file, "# corp hosts\ncorp.example\n").unwrap();

        let mut config = ScannerConfig::default();
        let allow = AllowArgs {
            allow_file: Some(allow_file),
            ..Default::default()
        };
        allow.apply(&mut config).unwrap();

        assert!(config.allow_list.contains("corp.example"));
        assert!(config.allow_list.contains("github.com"));
    }

    #[test]
    fn test_invalid_allow_entry_rejected() {
        let mut config = ScannerConfig::default();
        let allow = AllowArgs {
            domains: vec!["https://github.com".to_string()],
            ..Default::default()
        };
        assert!(allow.apply(&mut config).is_err());
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("remote_domains.yaml");

        let yaml = serde_yaml::to_string(&ScannerConfig::default()).unwrap();
        fs::write(&config_file, yaml).unwrap();
        assert_eq!(run_validate_config(Some(config_file.clone())).unwrap(), 0);

        fs::write(&config_file, "version: \"9\"\n").unwrap();
        assert_eq!(run_validate_config(Some(config_file)).unwrap(), 1);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "remote-domains",
            "scan",
            "--allow",
            "server.org",
            "--allow",
            "example.com",
            "--format",
            "plain",
            "--recursive",
            "repos",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan { paths, allow, recursive, format, .. } => {
                assert_eq!(paths, vec![PathBuf::from("repos")]);
                assert_eq!(allow.domains, vec!["server.org", "example.com"]);
                assert!(recursive);
                assert!(format == OutputFormatArg::Plain);
            }
            _ => panic!("expected scan command"),
        }
    }
}
