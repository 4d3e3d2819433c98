//! Cleanup engine
//!
//! Drives the selected rules in catalogue order, resolves their targets,
//! and removes entries. User-scope rules touch the filesystem directly;
//! rules that need elevation go through the session manager and run their
//! removals via the elevation tool. The engine never terminates the run on
//! per-entry errors: failures are counted, capped into notes, and reported.

use anyhow::{Context, Result};
use glob::Pattern;
use log::info;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::{CleanupReport, RuleOutcome, RuleStatus, RunOptions, RunSummary};
use crate::rules::targets::{entry_size, old_enough, Target, TargetScope, TargetSet};
use crate::rules::{
    self, MaintenanceCommand, MaintenanceSet, ProcessInventory, Rule, RuleContext, RuleKind,
};
use crate::session::{self, SessionManager};

/// At most this many per-entry failure details are kept per rule; the rest
/// collapse into a single count note
const MAX_FAILURE_NOTES: usize = 3;

/// Run a cleanup pass over the catalogue rules selected by `options`.
///
/// The run itself is infallible: every problem is absorbed into the report.
/// `interrupted` is checked between rules and between entries, so a signal
/// stops the run promptly and still yields a partial report.
pub fn run(
    options: &RunOptions,
    session: &mut SessionManager,
    interrupted: &Arc<AtomicBool>,
) -> CleanupReport {
    let rules = rules::catalogue();
    let selected = rules::select(&rules, &options.rule_patterns);
    let context = RuleContext {
        home: options.home.clone(),
        min_age: options.min_age,
        running: ProcessInventory::capture(),
    };

    execute(&selected, &context, options, session, interrupted)
}

/// Run an explicit rule list against a prepared context. `run` is a thin
/// wrapper over this; tests drive it directly with synthetic rules.
fn execute(
    selected: &[&Rule],
    context: &RuleContext,
    options: &RunOptions,
    session: &mut SessionManager,
    interrupted: &Arc<AtomicBool>,
) -> CleanupReport {
    let started = Instant::now();
    info!(
        "Cleanup started: {} rules selected, dry_run={}",
        selected.len(),
        options.dry_run
    );

    let mut results: Vec<RuleOutcome> = Vec::with_capacity(selected.len());
    let mut elevation_used = false;

    for rule in selected {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }

        if options.disabled_rules.iter().any(|id| id == rule.id) {
            results.push(skipped_outcome(rule, "disabled by configuration"));
            continue;
        }

        // Dry runs only measure, so they never need (or prompt for) a session
        if rule.needs_elevation && !options.dry_run {
            if options.no_elevation {
                results.push(skipped_outcome(rule, "elevation disabled (--no-elevation)"));
                continue;
            }
            if !session.ensure(rule.title) {
                results.push(skipped_outcome(rule, "administrator access not granted"));
                continue;
            }
            elevation_used = true;
        }

        let outcome = match rule.kind {
            RuleKind::Paths(resolve) => {
                run_path_rule(rule, resolve(context), options, interrupted)
            }
            RuleKind::Maintenance(resolve) => {
                run_maintenance_rule(rule, resolve(context), options, interrupted)
            }
        };
        results.push(outcome);
    }

    let mut rules_run = 0;
    let mut rules_skipped = 0;
    let mut rules_failed = 0;
    let mut reclaimed_bytes = 0u64;
    for outcome in &results {
        match &outcome.status {
            RuleStatus::Cleaned | RuleStatus::WouldClean => rules_run += 1,
            RuleStatus::Skipped(_) => rules_skipped += 1,
            RuleStatus::Failed(_) => rules_failed += 1,
        }
        reclaimed_bytes += outcome.reclaimed_bytes;
    }

    let was_interrupted = interrupted.load(Ordering::SeqCst);
    info!(
        "Cleanup finished: {} run, {} skipped, {} failed, {} bytes reclaimed",
        rules_run, rules_skipped, rules_failed, reclaimed_bytes
    );

    CleanupReport {
        results,
        summary: RunSummary {
            run_id: Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            rules_run,
            rules_skipped,
            rules_failed,
            reclaimed_bytes,
            duration_ms: started.elapsed().as_millis() as u64,
            dry_run: options.dry_run,
            elevation_used,
            interrupted: if was_interrupted { Some(true) } else { None },
        },
    }
}

fn skipped_outcome(rule: &Rule, reason: &str) -> RuleOutcome {
    RuleOutcome {
        rule: rule.id.to_string(),
        title: rule.title.to_string(),
        status: RuleStatus::Skipped(reason.to_string()),
        reclaimed_bytes: 0,
        removed_entries: 0,
        failed_entries: 0,
        notes: Vec::new(),
    }
}

/// Resolve a path rule's targets into concrete entries, then measure or
/// remove them
fn run_path_rule(
    rule: &Rule,
    set: TargetSet,
    options: &RunOptions,
    interrupted: &Arc<AtomicBool>,
) -> RuleOutcome {
    let TargetSet { targets, mut notes } = set;
    let candidates = collect_candidates(&targets, options);

    if candidates.is_empty() {
        return RuleOutcome {
            rule: rule.id.to_string(),
            title: rule.title.to_string(),
            status: RuleStatus::Skipped("nothing to clean".to_string()),
            reclaimed_bytes: 0,
            removed_entries: 0,
            failed_entries: 0,
            notes,
        };
    }

    // Sizes are measured up front; after removal there is nothing left to ask
    let sizes: Vec<u64> = candidates.par_iter().map(|path| entry_size(path)).collect();

    if options.dry_run {
        return RuleOutcome {
            rule: rule.id.to_string(),
            title: rule.title.to_string(),
            status: RuleStatus::WouldClean,
            reclaimed_bytes: sizes.iter().sum(),
            removed_entries: candidates.len(),
            failed_entries: 0,
            notes,
        };
    }

    let mut removed = 0usize;
    let mut failed = 0usize;
    let mut reclaimed = 0u64;
    for (path, size) in candidates.iter().zip(sizes.iter()) {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }

        let result = if rule.needs_elevation {
            remove_elevated(path, options)
        } else {
            remove_entry(path)
        };

        match result {
            Ok(()) => {
                removed += 1;
                reclaimed += *size;
            }
            Err(err) => {
                failed += 1;
                if failed <= MAX_FAILURE_NOTES {
                    let detail = format!("failed to remove {}: {:#}", path.display(), err);
                    if !options.quiet_mode {
                        eprintln!("Warning: {}", detail);
                    }
                    notes.push(detail);
                }
            }
        }
    }
    if failed > MAX_FAILURE_NOTES {
        notes.push(format!(
            "{} more entries could not be removed",
            failed - MAX_FAILURE_NOTES
        ));
    }

    let status = if removed > 0 {
        RuleStatus::Cleaned
    } else if failed > 0 {
        RuleStatus::Failed(format!("{} entries could not be removed", failed))
    } else {
        // the interrupt landed before the first entry
        RuleStatus::Skipped("interrupted".to_string())
    };

    RuleOutcome {
        rule: rule.id.to_string(),
        title: rule.title.to_string(),
        status,
        reclaimed_bytes: reclaimed,
        removed_entries: removed,
        failed_entries: failed,
        notes,
    }
}

/// Run a maintenance rule's commands through the elevation tool
fn run_maintenance_rule(
    rule: &Rule,
    set: MaintenanceSet,
    options: &RunOptions,
    interrupted: &Arc<AtomicBool>,
) -> RuleOutcome {
    let MaintenanceSet { commands, mut notes } = set;

    if commands.is_empty() {
        return RuleOutcome {
            rule: rule.id.to_string(),
            title: rule.title.to_string(),
            status: RuleStatus::Skipped("nothing to clean".to_string()),
            reclaimed_bytes: 0,
            removed_entries: 0,
            failed_entries: 0,
            notes,
        };
    }

    if options.dry_run {
        for command in &commands {
            notes.push(format!("would run: {}", command.description));
        }
        return RuleOutcome {
            rule: rule.id.to_string(),
            title: rule.title.to_string(),
            status: RuleStatus::WouldClean,
            reclaimed_bytes: 0,
            removed_entries: commands.len(),
            failed_entries: 0,
            notes,
        };
    }

    let mut completed = 0usize;
    let mut failed = 0usize;
    for command in &commands {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }

        match run_elevated_command(command, options) {
            Ok(()) => completed += 1,
            Err(err) => {
                failed += 1;
                if failed <= MAX_FAILURE_NOTES {
                    let detail = format!("{:#}", err);
                    if !options.quiet_mode {
                        eprintln!("Warning: {}", detail);
                    }
                    notes.push(detail);
                }
            }
        }
    }
    if failed > MAX_FAILURE_NOTES {
        notes.push(format!("{} more commands failed", failed - MAX_FAILURE_NOTES));
    }

    let status = if completed > 0 {
        RuleStatus::Cleaned
    } else if failed > 0 {
        RuleStatus::Failed(format!("{} commands failed", failed))
    } else {
        RuleStatus::Skipped("interrupted".to_string())
    };

    RuleOutcome {
        rule: rule.id.to_string(),
        title: rule.title.to_string(),
        status,
        reclaimed_bytes: 0,
        removed_entries: completed,
        failed_entries: failed,
        notes,
    }
}

/// Flatten targets into the concrete entries a rule may remove, applying
/// exclusions and age gates. Contents targets expand to their direct
/// children; tree targets stand for themselves.
fn collect_candidates(targets: &[Target], options: &RunOptions) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for target in targets {
        match target.scope {
            TargetScope::Tree => {
                if fs::symlink_metadata(&target.path).is_ok()
                    && admit(&target.path, target.min_age, options)
                {
                    candidates.push(target.path.clone());
                }
            }
            TargetScope::Contents => {
                let entries = match fs::read_dir(&target.path) {
                    Ok(entries) => entries,
                    Err(_) => continue,
                };
                for entry in entries.filter_map(|entry| entry.ok()) {
                    let path = entry.path();
                    if admit(&path, target.min_age, options) {
                        candidates.push(path);
                    }
                }
            }
        }
    }

    candidates.sort();
    candidates.dedup();
    candidates
}

fn admit(path: &Path, min_age: Option<Duration>, options: &RunOptions) -> bool {
    if is_excluded(path, &options.exclude_patterns) {
        return false;
    }
    match min_age {
        Some(age) => old_enough(path, age),
        None => true,
    }
}

fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| pattern.matches_path(path))
}

/// Remove a filesystem entry without following symlinks
fn remove_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Cannot stat {}", path.display()))?;

    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Cannot remove directory {}", path.display()))?;
    } else {
        fs::remove_file(path).with_context(|| format!("Cannot remove {}", path.display()))?;
    }
    Ok(())
}

/// Remove a system-owned entry through the elevation tool. `-n` keeps the
/// call non-interactive: the keepalive worker is responsible for the grant
/// staying fresh, and a lapsed grant must fail instead of prompting mid-run.
fn remove_elevated(path: &Path, options: &RunOptions) -> Result<()> {
    if !session::session_active() {
        anyhow::bail!("no elevated session");
    }

    let status = Command::new(&options.elevation_command)
        .args(["-n", "rm", "-rf", "--"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("Cannot run {}", options.elevation_command))?;

    if !status.success() {
        anyhow::bail!("elevated removal of {} exited with {}", path.display(), status);
    }
    Ok(())
}

/// Run one maintenance command through the elevation tool
fn run_elevated_command(command: &MaintenanceCommand, options: &RunOptions) -> Result<()> {
    if !session::session_active() {
        anyhow::bail!("no elevated session");
    }

    let status = Command::new(&options.elevation_command)
        .arg("-n")
        .arg(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("Cannot run {}", options.elevation_command))?;

    if !status.success() {
        anyhow::bail!("{} exited with {}", command.description, status);
    }
    Ok(())
}
