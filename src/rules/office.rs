//! Microsoft Office container cache rule
//!
//! Office apps are sandboxed, so their caches live under per-bundle
//! containers. Bundle ids are read from the installed app bundles'
//! Info.plist files; a known-id table covers bundles whose plist cannot be
//! read. Running apps are skipped like browsers are.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::targets::{Target, TargetSet};
use super::RuleContext;

/// Office apps with container caches worth cleaning
const KNOWN_OFFICE_APPS: &[(&str, &str)] = &[
    ("Microsoft Word", "com.microsoft.Word"),
    ("Microsoft Excel", "com.microsoft.Excel"),
    ("Microsoft PowerPoint", "com.microsoft.Powerpoint"),
    ("Microsoft Outlook", "com.microsoft.Outlook"),
    ("Microsoft OneNote", "com.microsoft.onenote.mac"),
];

/// Read CFBundleIdentifier from an app bundle's Info.plist
fn bundle_identifier(app_dir: &Path) -> Option<String> {
    let info = app_dir.join("Contents/Info.plist");
    let value = plist::Value::from_file(info).ok()?;
    value
        .as_dictionary()?
        .get("CFBundleIdentifier")?
        .as_string()
        .map(|id| id.to_string())
}

/// (app name, bundle id) for every Microsoft app bundle in a directory
fn installed_microsoft_apps(applications: &Path) -> Vec<(String, String)> {
    let entries = match fs::read_dir(applications) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut apps = Vec::new();
    for entry in entries.filter_map(|entry| entry.ok()) {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if !name.starts_with("Microsoft ") || !name.ends_with(".app") {
            continue;
        }
        if let Some(bundle) = bundle_identifier(&entry.path()) {
            apps.push((name.trim_end_matches(".app").to_string(), bundle));
        }
    }
    apps
}

/// Container cache path for a sandboxed bundle id
fn container_caches(home: &Path, bundle: &str) -> PathBuf {
    home.join("Library/Containers")
        .join(bundle)
        .join("Data/Library/Caches")
}

/// Container caches of installed Office apps that are not running
pub fn office_caches(ctx: &RuleContext) -> TargetSet {
    office_caches_in(ctx, Path::new("/Applications"))
}

fn office_caches_in(ctx: &RuleContext, applications: &Path) -> TargetSet {
    let mut set = TargetSet::default();

    // bundle id -> app name, known table first, discovery fills the gaps
    let mut apps: BTreeMap<String, String> = KNOWN_OFFICE_APPS
        .iter()
        .map(|(name, bundle)| (bundle.to_string(), name.to_string()))
        .collect();
    for (name, bundle) in installed_microsoft_apps(applications) {
        apps.entry(bundle).or_insert(name);
    }

    for (bundle, name) in &apps {
        if ctx.running.is_running(name) {
            set.note(format!("{} is running; skipping its container caches", name));
            continue;
        }
        let caches = container_caches(&ctx.home, bundle);
        if caches.exists() {
            set.push(Target::contents(caches));
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ProcessInventory;
    use std::time::Duration;
    use tempfile::tempdir;

    const WORD_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>com.microsoft.Word</string>
    <key>CFBundleName</key>
    <string>Microsoft Word</string>
</dict>
</plist>
"#;

    fn context(home: std::path::PathBuf, running: ProcessInventory) -> RuleContext {
        RuleContext {
            home,
            min_age: Duration::ZERO,
            running,
        }
    }

    #[test]
    fn test_container_cache_path_mapping() {
        let path = container_caches(Path::new("/Users/example"), "com.microsoft.Word");
        assert_eq!(
            path,
            PathBuf::from(
                "/Users/example/Library/Containers/com.microsoft.Word/Data/Library/Caches"
            )
        );
    }

    #[test]
    fn test_bundle_identifier_is_read_from_info_plist() {
        let dir = tempdir().unwrap();
        let app = dir.path().join("Microsoft Word.app");
        fs::create_dir_all(app.join("Contents")).unwrap();
        fs::write(app.join("Contents/Info.plist"), WORD_PLIST).unwrap();

        assert_eq!(
            bundle_identifier(&app),
            Some("com.microsoft.Word".to_string())
        );
    }

    #[test]
    fn test_discovery_only_looks_at_microsoft_app_bundles() {
        let dir = tempdir().unwrap();
        let word = dir.path().join("Microsoft Word.app");
        fs::create_dir_all(word.join("Contents")).unwrap();
        fs::write(word.join("Contents/Info.plist"), WORD_PLIST).unwrap();
        fs::create_dir_all(dir.path().join("Safari.app/Contents")).unwrap();
        fs::create_dir_all(dir.path().join("Microsoft Teams")).unwrap();

        let apps = installed_microsoft_apps(dir.path());
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].0, "Microsoft Word");
        assert_eq!(apps[0].1, "com.microsoft.Word");
    }

    #[test]
    fn test_existing_containers_are_targeted() {
        let home = tempdir().unwrap();
        let word_caches = container_caches(home.path(), "com.microsoft.Word");
        fs::create_dir_all(&word_caches).unwrap();

        let apps = tempdir().unwrap();
        let ctx = context(home.path().to_path_buf(), ProcessInventory::default());
        let set = office_caches_in(&ctx, apps.path());

        assert_eq!(set.targets.len(), 1);
        assert_eq!(set.targets[0].path, word_caches);
    }

    #[test]
    fn test_running_office_app_is_skipped() {
        let home = tempdir().unwrap();
        let outlook_caches = container_caches(home.path(), "com.microsoft.Outlook");
        fs::create_dir_all(&outlook_caches).unwrap();

        let apps = tempdir().unwrap();
        let ctx = context(
            home.path().to_path_buf(),
            ProcessInventory::from_names(["Microsoft Outlook"]),
        );
        let set = office_caches_in(&ctx, apps.path());

        assert!(set.targets.is_empty());
        assert!(set
            .notes
            .iter()
            .any(|note| note.contains("Microsoft Outlook is running")));
    }
}
