//! Trash rule

use super::targets::{Target, TargetSet};
use super::RuleContext;

/// Contents of `~/.Trash`
pub fn trash(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(ctx.home.join(".Trash")));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ProcessInventory;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_trash_resolves_under_home() {
        let ctx = RuleContext {
            home: PathBuf::from("/Users/example"),
            min_age: Duration::ZERO,
            running: ProcessInventory::default(),
        };

        let set = trash(&ctx);
        assert_eq!(set.targets.len(), 1);
        assert_eq!(set.targets[0].path, PathBuf::from("/Users/example/.Trash"));
    }
}
