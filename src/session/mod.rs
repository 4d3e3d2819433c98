//! Elevated-privilege session management
//!
//! A session is an OS elevation grant plus the keepalive worker that stops
//! it from expiring. `SessionManager` is the single owner of the session
//! state and drives the cycle NoSession -> Requesting -> Active -> NoSession;
//! `ensure` is a no-op while Active and `release` is idempotent always, so
//! both can be called freely from any cleanup path.
//!
//! A process-wide read-only flag mirrors the established state for code that
//! only needs to know whether privileged work is possible right now, without
//! borrowing the manager.

pub mod handle;
pub mod keepalive;
pub mod privilege;

pub use handle::WorkerHandle;
pub use keepalive::{Keepalive, KeepaliveWorker};
pub use privilege::{Elevator, PrivilegeProbe, Sudo};

use log::warn;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::logging;

/// Mirror of the established flag, readable without the manager
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether an elevated session is currently established in this process
pub fn session_active() -> bool {
    SESSION_ACTIVE.load(Ordering::SeqCst)
}

/// Session state, owned exclusively by the manager.
///
/// `established` and the worker handle move together: both set while a
/// session is active, both clear otherwise.
#[derive(Debug, Default)]
pub struct SessionState {
    established: bool,
    keepalive: Option<WorkerHandle>,
}

impl SessionState {
    pub fn established(&self) -> bool {
        self.established
    }

    /// Id of the current keepalive worker, if any
    pub fn worker_id(&self) -> Option<&str> {
        self.keepalive.as_ref().map(|handle| handle.id())
    }

    fn is_consistent(&self) -> bool {
        self.established == self.keepalive.is_some()
    }

    fn activate(&mut self, worker: WorkerHandle) {
        self.established = true;
        self.keepalive = Some(worker);
        SESSION_ACTIVE.store(true, Ordering::SeqCst);
    }

    fn clear(&mut self) -> Option<WorkerHandle> {
        self.established = false;
        SESSION_ACTIVE.store(false, Ordering::SeqCst);
        self.keepalive.take()
    }
}

/// Owner of the elevation grant lifecycle
pub struct SessionManager {
    probe: Arc<dyn PrivilegeProbe>,
    elevator: Box<dyn Elevator>,
    keepalive: Box<dyn Keepalive>,
    state: SessionState,
}

impl SessionManager {
    /// Production manager backed by the given elevation tool
    pub fn new(elevation_command: &str) -> Self {
        let sudo = Sudo::with_command(elevation_command);
        Self::with_collaborators(
            Arc::new(sudo.clone()),
            Box::new(sudo),
            Box::new(KeepaliveWorker::new()),
        )
    }

    /// Manager with explicit collaborators; tests substitute doubles here
    pub fn with_collaborators(
        probe: Arc<dyn PrivilegeProbe>,
        elevator: Box<dyn Elevator>,
        keepalive: Box<dyn Keepalive>,
    ) -> Self {
        Self {
            probe,
            elevator,
            keepalive,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn established(&self) -> bool {
        self.state.established()
    }

    /// Non-interactive check of the underlying grant
    pub fn grant_active(&self) -> bool {
        self.probe.has_active_grant()
    }

    /// Make sure an elevated session is running, prompting the user if the
    /// grant is not already active. Returns true when the session is usable.
    /// A false return means elevation was denied or unavailable, or the
    /// keepalive could not start; no partial session is left behind.
    pub fn ensure(&mut self, reason: &str) -> bool {
        if self.state.established() {
            return true;
        }

        if !self.probe.has_active_grant() {
            if !self.elevator.request_interactive(reason) {
                let shown = if reason.trim().is_empty() {
                    "no reason given"
                } else {
                    reason
                };
                warn!("Elevation was not granted ({})", shown);
                debug_assert!(self.state.is_consistent());
                return false;
            }
        }

        match self.keepalive.start(Arc::clone(&self.probe)) {
            Ok(worker) => {
                logging::session_event(
                    "session_established",
                    json!({ "worker_id": worker.id() }),
                );
                self.state.activate(worker);
                debug_assert!(self.state.is_consistent());
                true
            }
            Err(err) => {
                // The grant exists but cannot be kept alive; report failure
                // rather than hand out a session that would silently expire
                warn!("Keepalive worker failed to start: {:#}", err);
                logging::session_event(
                    "session_rollback",
                    json!({ "error": format!("{:#}", err) }),
                );
                debug_assert!(self.state.is_consistent());
                false
            }
        }
    }

    /// Tear the session down. Idempotent; safe without a session and with a
    /// stale worker handle.
    pub fn release(&mut self) {
        if let Some(worker) = self.state.clear() {
            logging::session_event("session_released", json!({ "worker_id": worker.id() }));
            self.keepalive.stop(worker);
        }
        debug_assert!(self.state.is_consistent());
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod doubles {
    //! Test doubles shared by the session and engine tests

    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Mutex, MutexGuard};

    /// SESSION_ACTIVE is process-global; tests that drive it serialize here
    static MIRROR_LOCK: Mutex<()> = Mutex::new(());

    pub fn mirror_lock() -> MutexGuard<'static, ()> {
        MIRROR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Probe with a fixed answer for both checks
    pub struct FixedProbe(pub bool);

    impl PrivilegeProbe for FixedProbe {
        fn has_active_grant(&self) -> bool {
            self.0
        }

        fn refresh(&self) -> bool {
            self.0
        }
    }

    /// Elevator with a scripted answer and a call counter
    pub struct ScriptedElevator {
        grant: bool,
        pub calls: Arc<AtomicUsize>,
    }

    impl ScriptedElevator {
        pub fn new(grant: bool) -> Self {
            Self {
                grant,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Elevator for ScriptedElevator {
        fn request_interactive(&self, _reason: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.grant
        }
    }

    /// Keepalive that hands out detached handles with a scripted id
    pub struct StubKeepalive {
        id: &'static str,
        pub starts: Arc<AtomicUsize>,
        pub stops: Arc<AtomicUsize>,
    }

    impl StubKeepalive {
        pub fn new(id: &'static str) -> Self {
            Self {
                id,
                starts: Arc::new(AtomicUsize::new(0)),
                stops: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Keepalive for StubKeepalive {
        fn start(&self, _probe: Arc<dyn PrivilegeProbe>) -> anyhow::Result<WorkerHandle> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(WorkerHandle::detached(self.id))
        }

        fn stop(&self, handle: WorkerHandle) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            handle.stop();
        }
    }

    /// Keepalive whose start always fails
    pub struct BrokenKeepalive;

    impl Keepalive for BrokenKeepalive {
        fn start(&self, _probe: Arc<dyn PrivilegeProbe>) -> anyhow::Result<WorkerHandle> {
            Err(anyhow!("worker thread could not be spawned"))
        }
    }
}
