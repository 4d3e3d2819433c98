//! Developer tool cache rules (Xcode, Homebrew)

use super::targets::{Target, TargetSet};
use super::RuleContext;

/// Xcode derived data and simulator caches. Both are rebuild artifacts;
/// removing them costs a rebuild, never data.
pub fn xcode(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(
        ctx.home.join("Library/Developer/Xcode/DerivedData"),
    ));
    set.push(Target::contents(
        ctx.home.join("Library/Developer/CoreSimulator/Caches"),
    ));
    set
}

/// Homebrew's download cache
pub fn homebrew(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(ctx.home.join("Library/Caches/Homebrew")));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ProcessInventory;
    use std::path::PathBuf;
    use std::time::Duration;

    fn context() -> RuleContext {
        RuleContext {
            home: PathBuf::from("/Users/example"),
            min_age: Duration::ZERO,
            running: ProcessInventory::default(),
        }
    }

    #[test]
    fn test_xcode_targets_derived_data_and_simulator_caches() {
        let set = xcode(&context());
        assert_eq!(set.targets.len(), 2);
        assert!(set.targets.iter().any(|t| t
            .path
            .ends_with("Library/Developer/Xcode/DerivedData")));
        assert!(set.targets.iter().any(|t| t
            .path
            .ends_with("Library/Developer/CoreSimulator/Caches")));
    }

    #[test]
    fn test_homebrew_targets_its_download_cache() {
        let set = homebrew(&context());
        assert_eq!(set.targets.len(), 1);
        assert_eq!(
            set.targets[0].path,
            PathBuf::from("/Users/example/Library/Caches/Homebrew")
        );
    }
}
