//! User and system cache rules

use std::path::PathBuf;

use super::targets::{Target, TargetSet};
use super::RuleContext;

/// Contents of `~/Library/Caches`
pub fn user_caches(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(ctx.home.join("Library/Caches")));
    set
}

/// Contents of `/Library/Caches` (system-owned; needs elevation)
pub fn system_caches(_ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();
    set.push(Target::contents(PathBuf::from("/Library/Caches")));
    set
}
