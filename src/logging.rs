//! macOS Unified Logging System integration
//!
//! Routes the log crate's macros to ULS under the application subsystem and
//! provides structured session lifecycle events. On other platforms init
//! reports failure and the macros stay no-ops; callers treat that as a
//! degraded mode, not an error.

use anyhow::Result;
use log::{info, warn};
use serde_json::json;

use crate::constants::APP_SUBSYSTEM;

/// Initialize Unified Logging for this process
#[cfg(target_os = "macos")]
pub fn init() -> Result<()> {
    let logger = oslog::OsLogger::new(APP_SUBSYSTEM);
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;
    log::set_max_level(log::LevelFilter::Info);
    Ok(())
}

/// Initialize Unified Logging for this process
#[cfg(not(target_os = "macos"))]
pub fn init() -> Result<()> {
    Err(anyhow::anyhow!("Unified Logging only available on macOS"))
}

/// Log a session lifecycle event with a structured JSON payload.
/// `detail` is expected to be a JSON object; its fields are merged into the
/// payload next to the event name and timestamp.
pub fn session_event(event: &str, detail: serde_json::Value) {
    let mut payload = json!({
        "event": event,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if let (Some(fields), Some(extra)) = (payload.as_object_mut(), detail.as_object()) {
        for (key, value) in extra {
            fields.insert(key.clone(), value.clone());
        }
    }

    info!("{} | {}", event, payload);
}

/// Log a non-fatal problem with a structured JSON payload
pub fn warning_event(event: &str, message: &str) {
    let payload = json!({
        "event": event,
        "message": message,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    warn!("{} | {}", event, payload);
}
