//! Grant keepalive worker
//!
//! Keeps an elevation grant from expiring by refreshing it on a fixed
//! interval from a supervised background thread. The loop owns nothing but
//! its probe; stopping it is a flag store plus a join. Refresh failures are
//! absorbed and retried on the next cycle, so a transient sudo hiccup never
//! tears the session down.

use anyhow::{Context, Result};
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::handle::WorkerHandle;
use super::privilege::PrivilegeProbe;
use crate::constants::{KEEPALIVE_POLL_SLICE, KEEPALIVE_REFRESH_INTERVAL};

/// Monotonic source for worker ids. The ids are opaque and process-local.
static WORKER_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_worker_id() -> String {
    (WORKER_SEQ.fetch_add(1, Ordering::Relaxed) + 1).to_string()
}

/// Starts and stops the refresh worker behind a session
pub trait Keepalive: Send {
    /// Spawn the refresh loop. The returned handle is immediately valid for
    /// `stop`.
    fn start(&self, probe: Arc<dyn PrivilegeProbe>) -> Result<WorkerHandle>;

    /// Stop a worker. Safe for handles whose worker is long gone.
    fn stop(&self, handle: WorkerHandle) {
        handle.stop();
    }
}

/// Production keepalive: a named thread refreshing on a fixed interval
pub struct KeepaliveWorker {
    refresh_interval: Duration,
    poll_slice: Duration,
}

impl KeepaliveWorker {
    pub fn new() -> Self {
        Self {
            refresh_interval: KEEPALIVE_REFRESH_INTERVAL,
            poll_slice: KEEPALIVE_POLL_SLICE,
        }
    }

    /// Custom intervals; tests run the loop at millisecond scale
    pub fn with_intervals(refresh_interval: Duration, poll_slice: Duration) -> Self {
        Self {
            refresh_interval,
            poll_slice,
        }
    }
}

impl Default for KeepaliveWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Keepalive for KeepaliveWorker {
    fn start(&self, probe: Arc<dyn PrivilegeProbe>) -> Result<WorkerHandle> {
        let id = next_worker_id();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let refresh_interval = self.refresh_interval;
        let poll_slice = self.poll_slice.max(Duration::from_millis(1));

        let thread = thread::Builder::new()
            .name(format!("keepalive-{}", id))
            .spawn(move || loop {
                // Sleep in short slices so a stop request is honored promptly
                let mut slept = Duration::ZERO;
                while slept < refresh_interval {
                    if cancel_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let step = poll_slice.min(refresh_interval - slept);
                    thread::sleep(step);
                    slept += step;
                }

                if cancel_flag.load(Ordering::Relaxed) {
                    return;
                }

                // A failed refresh is retried next cycle; the loop only ever
                // exits through its cancel flag
                if !probe.refresh() {
                    debug!("Grant refresh failed; retrying next cycle");
                }
            })
            .context("Failed to spawn keepalive worker thread")?;

        Ok(WorkerHandle::running(id, cancel, thread))
    }
}
