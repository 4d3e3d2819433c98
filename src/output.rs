//! Output formatting module
//!
//! Handles:
//! - Human-readable report formatting
//! - JSON serialization of reports, rule lists, and session status
//! - Quiet mode behavior

use anyhow::Result;

use crate::models::{CleanupReport, RuleListEntry, RuleOutcome, RuleStatus};
use crate::rules;
use crate::session::PrivilegeProbe;

/// Format a byte count into human-readable units
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Render one rule outcome as a single aligned line.
/// This is the canonical line format for the final report — shared here so
/// tests can pin it down separately from the printing path.
pub fn format_outcome_line(outcome: &RuleOutcome) -> String {
    let (marker, detail) = match &outcome.status {
        RuleStatus::Cleaned => (
            '+',
            format!(
                "cleaned: {} reclaimed ({} entries)",
                format_bytes(outcome.reclaimed_bytes),
                outcome.removed_entries
            ),
        ),
        RuleStatus::WouldClean => (
            '~',
            format!(
                "would reclaim {} ({} entries)",
                format_bytes(outcome.reclaimed_bytes),
                outcome.removed_entries
            ),
        ),
        RuleStatus::Skipped(reason) => ('-', format!("skipped ({})", reason)),
        RuleStatus::Failed(reason) => ('!', format!("failed ({})", reason)),
    };

    format!("{} {:<16} {}", marker, outcome.rule, detail)
}

/// Print the cleanup report in human-readable format
pub fn format_human(report: &CleanupReport, quiet: bool) -> Result<()> {
    if report.results.is_empty() {
        println!("No rules were run.");
    } else {
        for outcome in &report.results {
            println!("{}", format_outcome_line(outcome));
            if !quiet {
                for note in &outcome.notes {
                    println!("    {}", note);
                }
            }
        }
    }

    // Print summary
    let summary = &report.summary;
    println!();
    println!("Cleanup Summary:");
    println!("  Rules run: {}", summary.rules_run);
    println!("  Rules skipped: {}", summary.rules_skipped);
    if summary.rules_failed > 0 {
        println!("  Rules failed: {}", summary.rules_failed);
    }

    if summary.dry_run {
        println!(
            "  Space reclaimable: {}",
            format_bytes(summary.reclaimed_bytes)
        );
        println!("  Mode: dry run (nothing was deleted)");
    } else {
        println!(
            "  Space reclaimed: {}",
            format_bytes(summary.reclaimed_bytes)
        );
    }

    // Format duration nicely
    let duration_sec = summary.duration_ms as f64 / 1000.0;
    if duration_sec < 1.0 {
        println!("  Duration: {}ms", summary.duration_ms);
    } else {
        println!("  Duration: {:.2}s", duration_sec);
    }

    if let Some(true) = summary.interrupted {
        println!("  Status: Interrupted by user");
    }

    if !quiet {
        let completed = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
        println!("  Completed: {}", completed);
    }

    Ok(())
}

/// Catalogue entries in execution order, for --list
pub fn list_entries() -> Vec<RuleListEntry> {
    rules::catalogue()
        .iter()
        .map(|rule| RuleListEntry {
            rule: rule.id.to_string(),
            title: rule.title.to_string(),
            needs_elevation: rule.needs_elevation,
        })
        .collect()
}

/// Print the rule catalogue
pub fn print_rule_list(json: bool) -> Result<()> {
    let entries = list_entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Available cleanup rules:\n");
    for entry in &entries {
        let marker = if entry.needs_elevation {
            " (requires administrator access)"
        } else {
            ""
        };
        println!("  {:<16} {}{}", entry.rule, entry.title, marker);
    }
    println!("\nRun with --rule <id> to clean specific rules; glob patterns are accepted.");

    Ok(())
}

/// Print whether an elevation grant is currently active
pub fn print_session_status(probe: &dyn PrivilegeProbe, json: bool) -> Result<()> {
    let active = probe.has_active_grant();

    if json {
        let status = serde_json::json!({ "elevation_active": active });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else if active {
        println!("Elevation: active (a cached administrator grant exists)");
    } else {
        println!("Elevation: inactive (privileged rules will prompt)");
    }

    Ok(())
}
