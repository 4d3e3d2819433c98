//! Cleanup rule catalogue
//!
//! A flat, declarative table of cleanup rules. Each rule maps a stable id to
//! a builder that resolves concrete targets (or maintenance commands); rule
//! selection is a lookup against this table, not a chain of name matches.

pub mod targets;

mod browsers;
mod caches;
mod developer;
mod logs;
mod office;
mod time_machine;
mod trash;

use anyhow::{anyhow, Result};
use glob::Pattern;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use sysinfo::{ProcessExt, System, SystemExt};

use crate::models::CleanupError;
use targets::TargetSet;

/// Inputs shared by every rule builder
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// Home directory user-scope rules resolve against
    pub home: PathBuf,
    /// Minimum age for age-gated targets
    pub min_age: Duration,
    /// Snapshot of running applications
    pub running: ProcessInventory,
}

/// Snapshot of running process names, lowercased for matching
#[derive(Debug, Clone, Default)]
pub struct ProcessInventory {
    names: HashSet<String>,
}

impl ProcessInventory {
    /// Capture the current process table
    pub fn capture() -> Self {
        let system = System::new_all();
        let names = system
            .processes()
            .values()
            .map(|process| process.name().to_lowercase())
            .collect();
        Self { names }
    }

    /// Inventory built from explicit names; used by tests
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// True when a process with this name, or a helper named after it, is
    /// running (e.g. "Google Chrome Helper" counts for "Google Chrome")
    pub fn is_running(&self, app: &str) -> bool {
        let needle = app.to_lowercase();
        self.names.iter().any(|name| name.starts_with(&needle))
    }
}

/// A command a rule wants executed instead of removing paths directly
#[derive(Debug, Clone)]
pub struct MaintenanceCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Short description for dry-run output and warnings
    pub description: String,
}

/// Maintenance commands plus notes produced while resolving them
#[derive(Debug, Clone, Default)]
pub struct MaintenanceSet {
    pub commands: Vec<MaintenanceCommand>,
    pub notes: Vec<String>,
}

impl MaintenanceSet {
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// What a rule produces when resolved
pub enum RuleKind {
    /// Filesystem entries to remove
    Paths(fn(&RuleContext) -> TargetSet),
    /// External maintenance commands to run (always elevated)
    Maintenance(fn(&RuleContext) -> MaintenanceSet),
}

/// One entry of the rule catalogue
pub struct Rule {
    /// Stable id used for selection and reporting
    pub id: &'static str,
    /// Human-readable title, also shown in elevation prompts
    pub title: &'static str,
    /// Whether the rule touches system-owned locations
    pub needs_elevation: bool,
    pub kind: RuleKind,
}

/// The catalogue, in execution order: user-scope rules first, then the
/// elevated ones so a single session covers them back to back
pub fn catalogue() -> Vec<Rule> {
    vec![
        Rule {
            id: "user-caches",
            title: "User cache directories",
            needs_elevation: false,
            kind: RuleKind::Paths(caches::user_caches),
        },
        Rule {
            id: "user-logs",
            title: "User log files",
            needs_elevation: false,
            kind: RuleKind::Paths(logs::user_logs),
        },
        Rule {
            id: "trash",
            title: "Trash",
            needs_elevation: false,
            kind: RuleKind::Paths(trash::trash),
        },
        Rule {
            id: "browser-caches",
            title: "Browser caches",
            needs_elevation: false,
            kind: RuleKind::Paths(browsers::browser_caches),
        },
        Rule {
            id: "office-caches",
            title: "Microsoft Office container caches",
            needs_elevation: false,
            kind: RuleKind::Paths(office::office_caches),
        },
        Rule {
            id: "xcode",
            title: "Xcode derived data and simulator caches",
            needs_elevation: false,
            kind: RuleKind::Paths(developer::xcode),
        },
        Rule {
            id: "homebrew",
            title: "Homebrew download cache",
            needs_elevation: false,
            kind: RuleKind::Paths(developer::homebrew),
        },
        Rule {
            id: "system-caches",
            title: "System cache directories",
            needs_elevation: true,
            kind: RuleKind::Paths(caches::system_caches),
        },
        Rule {
            id: "system-logs",
            title: "System log files",
            needs_elevation: true,
            kind: RuleKind::Paths(logs::system_logs),
        },
        Rule {
            id: "time-machine",
            title: "Time Machine local snapshots",
            needs_elevation: true,
            kind: RuleKind::Maintenance(time_machine::local_snapshots),
        },
    ]
}

/// Check if a selector contains glob pattern characters
pub fn is_glob_pattern(selector: &str) -> bool {
    selector.contains('*') || selector.contains('?') || selector.contains('[')
}

/// Match a rule id against a selector using exact or glob matching
pub fn matches_rule_selector(rule_id: &str, selector: &str) -> bool {
    if is_glob_pattern(selector) {
        match Pattern::new(selector) {
            Ok(pattern) => pattern.matches(rule_id),
            Err(_) => rule_id == selector,
        }
    } else {
        rule_id == selector
    }
}

/// Validate selectors: syntactically correct and matching at least one rule
pub fn validate_rule_selectors(selectors: &[String]) -> Result<()> {
    let rules = catalogue();

    for selector in selectors {
        if is_glob_pattern(selector) {
            Pattern::new(selector)
                .map_err(|e| anyhow!("Invalid rule pattern '{}': {}", selector, e))?;
        }
        if !rules.iter().any(|rule| matches_rule_selector(rule.id, selector)) {
            return Err(CleanupError::UnknownRulePattern(selector.clone()).into());
        }
    }

    Ok(())
}

/// Select rules per explicit selectors; empty selects everything
pub fn select<'a>(rules: &'a [Rule], selectors: &[String]) -> Vec<&'a Rule> {
    if selectors.is_empty() {
        return rules.iter().collect();
    }

    rules
        .iter()
        .filter(|rule| {
            selectors
                .iter()
                .any(|selector| matches_rule_selector(rule.id, selector))
        })
        .collect()
}
