//! Time Machine local snapshot rule
//!
//! Enumerates local snapshots with `tmutil listlocalsnapshots` (which needs
//! no elevation) and produces one delete command per snapshot. The deletes
//! run elevated through the engine.

use std::process::Command;

use super::{MaintenanceCommand, MaintenanceSet, RuleContext};

const SNAPSHOT_PREFIX: &str = "com.apple.TimeMachine.";

/// Extract snapshot dates from `tmutil listlocalsnapshots /` output.
/// Lines look like `com.apple.TimeMachine.2024-08-20-123456.local`; older
/// systems omit the `.local` suffix.
fn parse_snapshot_dates(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix(SNAPSHOT_PREFIX))
        .map(|rest| rest.trim_end_matches(".local").to_string())
        .filter(|date| !date.is_empty())
        .collect()
}

/// One delete command per local snapshot on the root volume
pub fn local_snapshots(_ctx: &RuleContext) -> MaintenanceSet {
    let mut set = MaintenanceSet::default();

    let output = match Command::new("tmutil")
        .args(["listlocalsnapshots", "/"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => {
            set.note("tmutil is not available; no snapshots enumerated");
            return set;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    for date in parse_snapshot_dates(&stdout) {
        set.commands.push(MaintenanceCommand {
            program: "tmutil".to_string(),
            args: vec!["deletelocalsnapshots".to_string(), date.clone()],
            description: format!("delete local snapshot {}", date),
        });
    }

    if set.commands.is_empty() {
        set.note("no local Time Machine snapshots");
    }

    set
}
