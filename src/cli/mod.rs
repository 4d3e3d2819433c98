//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - Rule selection (exact ids and glob patterns)
//! - Dry-run, quiet, and JSON output modes
//! - Configuration file override
//! - Elevation opt-out
//! - Help and version commands

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use mopup::rules;

/// Parsed command-line options, before merging with the configuration file
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub dry_run: bool,
    pub json_output: bool,
    pub quiet_mode: bool,
    /// Rule id selectors (exact or glob); empty selects the whole catalogue
    pub rule_patterns: Vec<String>,
    /// List the rule catalogue and exit
    pub list: bool,
    /// Report elevation grant status and exit
    pub status: bool,
    /// Explicit configuration file instead of the default location
    pub config_path: Option<PathBuf>,
    /// Never prompt for elevation; privileged rules are skipped
    pub no_elevation: bool,
}

/// Parse command line arguments and return CLI options
pub fn parse_args() -> Result<CliOptions> {
    let matches = Command::new("mopup")
        .version(env!("MOPUP_VERSION"))
        .about("Clean caches, logs, and stale application data on macOS")
        .long_about(
            "A command-line tool to reclaim disk space on macOS by cleaning caches, \
             logs, browser and application leftovers, and Time Machine local snapshots. \
             Rules that touch system-owned locations elevate once and keep the grant \
             alive for the rest of the run.",
        )
        .arg(
            Arg::new("dry-run")
                .short('d')
                .long("dry-run")
                .help("Measure what would be removed without deleting anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("rule")
                .short('r')
                .long("rule")
                .value_name("ID")
                .help("Run only matching rules (exact id or glob pattern)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available cleanup rules and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("status")
                .short('s')
                .long("status")
                .help("Report whether an administrator grant is active and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Use this configuration file instead of the default"),
        )
        .arg(
            Arg::new("no-elevation")
                .long("no-elevation")
                .help("Never prompt for administrator access; skip privileged rules")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress warnings and per-rule notes")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Validate rule selectors before any work happens
    let rule_patterns: Vec<String> = matches
        .get_many::<String>("rule")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    rules::validate_rule_selectors(&rule_patterns)?;

    // Validate the config path if provided
    let config_path = match matches.get_one::<String>("config") {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                return Err(anyhow!("Config file does not exist: {}", path_str));
            }
            Some(path)
        }
        None => None,
    };

    Ok(CliOptions {
        dry_run: matches.get_flag("dry-run"),
        json_output: matches.get_flag("json"),
        quiet_mode: matches.get_flag("quiet"),
        rule_patterns,
        list: matches.get_flag("list"),
        status: matches.get_flag("status"),
        config_path,
        no_elevation: matches.get_flag("no-elevation"),
    })
}
