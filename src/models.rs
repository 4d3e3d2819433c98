//! Data models module
//!
//! Defines core data structures:
//! - RuleOutcome / RuleStatus: per-rule cleanup results
//! - RunSummary / CleanupReport: aggregated run output
//! - RuleListEntry: catalogue listing for --list
//! - RunOptions: resolved options for one cleanup run
//! - CleanupError: user-facing validation errors

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_ELEVATION_COMMAND, DEFAULT_MIN_AGE_DAYS};

/// Result of running (or skipping) a single cleanup rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Stable rule id
    pub rule: String,
    /// Human-readable rule title
    pub title: String,
    pub status: RuleStatus,
    /// Bytes freed, or measured as freeable in a dry run
    pub reclaimed_bytes: u64,
    /// Entries removed; in a dry run, entries that would be removed
    pub removed_entries: usize,
    /// Entries that could not be removed
    pub failed_entries: usize,
    /// Explanatory notes (skipped apps, capped failure details)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Terminal state of a rule within one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum RuleStatus {
    /// Entries were removed (possibly with some failures)
    Cleaned,
    /// Dry run: nothing touched, candidates measured
    WouldClean,
    /// Rule did not run; the detail says why
    Skipped(String),
    /// Rule ran but removed nothing and hit errors
    Failed(String),
}

/// Summary statistics for a cleanup run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique id for this run, for log correlation
    pub run_id: String,
    /// RFC 3339 timestamp of report generation
    pub generated_at: String,
    /// Rules that ran to completion (cleaned or measured)
    pub rules_run: usize,
    pub rules_skipped: usize,
    pub rules_failed: usize,
    pub reclaimed_bytes: u64,
    pub duration_ms: u64,
    pub dry_run: bool,
    /// Whether an elevated session was established during the run
    pub elevation_used: bool,
    /// Whether the run was interrupted by user signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<bool>,
}

/// Complete output structure for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub results: Vec<RuleOutcome>,
    pub summary: RunSummary,
}

/// One catalogue entry as printed by --list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleListEntry {
    pub rule: String,
    pub title: String,
    pub needs_elevation: bool,
}

/// Resolved options for one cleanup run (CLI merged with configuration)
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Home directory all user-scope rules resolve against
    pub home: PathBuf,
    pub dry_run: bool,
    pub json_output: bool,
    pub quiet_mode: bool,
    /// Rule id selectors (exact or glob); empty selects the whole catalogue
    pub rule_patterns: Vec<String>,
    /// Never prompt for elevation; privileged rules are skipped
    pub no_elevation: bool,
    /// Minimum age for age-gated targets
    pub min_age: Duration,
    /// Rule ids disabled by configuration
    pub disabled_rules: Vec<String>,
    /// Entries matching any of these patterns are never removed
    pub exclude_patterns: Vec<Pattern>,
    /// Elevation tool for privileged rules
    pub elevation_command: String,
}

impl RunOptions {
    /// Options with built-in defaults for the given home directory
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            dry_run: false,
            json_output: false,
            quiet_mode: false,
            rule_patterns: Vec::new(),
            no_elevation: false,
            min_age: Duration::from_secs(DEFAULT_MIN_AGE_DAYS * 24 * 60 * 60),
            disabled_rules: Vec::new(),
            exclude_patterns: Vec::new(),
            elevation_command: DEFAULT_ELEVATION_COMMAND.to_string(),
        }
    }
}

/// Custom error types for cleanup operations
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    /// Note: bounds must match MIN_AGE_DAYS_MAX in constants.rs
    #[error("Invalid minimum age: {0}. Must be between 0 and 3650 days")]
    InvalidMinAge(u64),
    #[error("Unknown rule pattern: '{0}'. Use --list to see available rules")]
    UnknownRulePattern(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_status_serializes_with_kind_and_detail() {
        let skipped = RuleStatus::Skipped("disabled by configuration".to_string());
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["kind"], "skipped");
        assert_eq!(value["detail"], "disabled by configuration");

        let cleaned = serde_json::to_value(&RuleStatus::Cleaned).unwrap();
        assert_eq!(cleaned["kind"], "cleaned");

        let dry = serde_json::to_value(&RuleStatus::WouldClean).unwrap();
        assert_eq!(dry["kind"], "would-clean");
    }

    #[test]
    fn test_empty_notes_are_omitted_from_json() {
        let outcome = RuleOutcome {
            rule: "trash".to_string(),
            title: "Trash".to_string(),
            status: RuleStatus::Cleaned,
            reclaimed_bytes: 10,
            removed_entries: 1,
            failed_entries: 0,
            notes: Vec::new(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_summary_omits_interrupted_when_absent() {
        let summary = RunSummary {
            run_id: "test".to_string(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            rules_run: 1,
            rules_skipped: 0,
            rules_failed: 0,
            reclaimed_bytes: 0,
            duration_ms: 5,
            dry_run: false,
            elevation_used: false,
            interrupted: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("interrupted").is_none());
    }

    #[test]
    fn test_cleanup_error_messages() {
        let err = CleanupError::InvalidMinAge(9999);
        assert_eq!(
            err.to_string(),
            "Invalid minimum age: 9999. Must be between 0 and 3650 days"
        );

        let err = CleanupError::UnknownRulePattern("no-such-rule".to_string());
        assert!(err.to_string().contains("Unknown rule pattern"));
        assert!(err.to_string().contains("--list"));
    }

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::new(PathBuf::from("/Users/example"));
        assert!(!options.dry_run);
        assert!(!options.no_elevation);
        assert_eq!(options.min_age, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(options.elevation_command, "sudo");
        assert!(options.rule_patterns.is_empty());
    }
}
