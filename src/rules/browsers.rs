//! Browser cache rules
//!
//! Table of per-browser cache locations. A browser that is currently running
//! is skipped with a note so live caches are not pulled out from under it.

use super::targets::{Target, TargetSet};
use super::RuleContext;

/// Cache locations for one browser, relative to the home directory
struct BrowserCaches {
    /// Process name as reported by the OS
    process: &'static str,
    /// Display name for notes
    name: &'static str,
    /// Cache directories whose contents are removed
    contents: &'static [&'static str],
    /// Cache directories removed whole (the browser recreates them)
    trees: &'static [&'static str],
}

const BROWSERS: &[BrowserCaches] = &[
    BrowserCaches {
        process: "Safari",
        name: "Safari",
        contents: &["Library/Caches/com.apple.Safari"],
        trees: &[],
    },
    BrowserCaches {
        process: "Google Chrome",
        name: "Google Chrome",
        contents: &["Library/Caches/Google/Chrome"],
        trees: &["Library/Application Support/Google/Chrome/Default/Cache"],
    },
    BrowserCaches {
        process: "Chromium",
        name: "Chromium",
        contents: &["Library/Caches/Chromium"],
        trees: &["Library/Application Support/Chromium/Default/Cache"],
    },
    BrowserCaches {
        process: "Brave Browser",
        name: "Brave",
        contents: &["Library/Caches/BraveSoftware"],
        trees: &[],
    },
    BrowserCaches {
        process: "Microsoft Edge",
        name: "Microsoft Edge",
        contents: &["Library/Caches/Microsoft Edge"],
        trees: &[],
    },
    BrowserCaches {
        process: "firefox",
        name: "Firefox",
        contents: &["Library/Caches/Firefox"],
        trees: &[],
    },
];

/// Cache targets for every installed browser that is not running
pub fn browser_caches(ctx: &RuleContext) -> TargetSet {
    let mut set = TargetSet::default();

    for browser in BROWSERS {
        if ctx.running.is_running(browser.process) {
            set.note(format!("{} is running; skipping its caches", browser.name));
            continue;
        }

        for dir in browser.contents {
            let path = ctx.home.join(dir);
            if path.exists() {
                set.push(Target::contents(path));
            }
        }
        for dir in browser.trees {
            let path = ctx.home.join(dir);
            if path.exists() {
                set.push(Target::tree(path));
            }
        }
    }

    set
}
