//! User and system log rules
//!
//! Log targets are age-gated: recent files stay so active troubleshooting
//! is not cut short by a cleanup run.

use std::path::PathBuf;

use super::targets::{Target, TargetSet};
use super::RuleContext;

/// Contents of `~/Library/Logs` older than the minimum age
pub fn user_logs(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(ctx.home.join("Library/Logs")).aged(ctx.min_age));
    set
}

/// System log locations older than the minimum age (needs elevation)
pub fn system_logs(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(PathBuf::from("/private/var/log")).aged(ctx.min_age));
    set.push(Target::contents(PathBuf::from("/Library/Logs")).aged(ctx.min_age));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ProcessInventory;
    use std::time::Duration;

    #[test]
    fn test_log_targets_carry_the_age_gate() {
        let ctx = RuleContext {
            home: PathBuf::from("/Users/example"),
            min_age: Duration::from_secs(3 * 24 * 60 * 60),
            running: ProcessInventory::default(),
        };

        let user = user_logs(&ctx);
        assert_eq!(user.targets[0].min_age, Some(ctx.min_age));

        let system = system_logs(&ctx);
        assert_eq!(system.targets.len(), 2);
        assert!(system.targets.iter().all(|t| t.min_age == Some(ctx.min_age)));
        assert!(system
            .targets
            .iter()
            .any(|t| t.path == PathBuf::from("/private/var/log")));
    }
}
