//! Global constants for mopup
//!
//! Centralized location for application-wide constants

use std::time::Duration;

/// Application subsystem identifier for macOS Unified Logging System
pub const APP_SUBSYSTEM: &str = "com.microsoft.sysinternals.mopup";

/// Interval between keepalive refreshes of the elevation grant.
/// sudo's default credential cache expires after 5 minutes; refreshing once
/// a minute survives a missed cycle without letting the grant lapse.
pub const KEEPALIVE_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Sleep slice inside the keepalive loop, so stop requests are honored
/// promptly instead of after a full refresh interval
pub const KEEPALIVE_POLL_SLICE: Duration = Duration::from_millis(250);

/// Elevation tool used when the configuration does not name one
pub const DEFAULT_ELEVATION_COMMAND: &str = "sudo";

/// Default minimum age in days for age-gated targets (log files)
pub const DEFAULT_MIN_AGE_DAYS: u64 = 7;

/// Upper bound for the configurable minimum age.
/// Note: must match the message on CleanupError::InvalidMinAge in models.rs
pub const MIN_AGE_DAYS_MAX: u64 = 3650;

/// Configuration file name under the user configuration directory
pub const CONFIG_FILE_NAME: &str = "mopup.toml";
