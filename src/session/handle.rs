//! Worker handles
//!
//! Opaque reference to a keepalive worker: an id plus the means to signal
//! and join it. A handle can also be detached (id only), standing in for a
//! worker that no longer exists; stopping such a handle is a silent no-op.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

pub struct WorkerHandle {
    id: String,
    cancel: Option<Arc<AtomicBool>>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Handle for a live worker thread
    pub(crate) fn running(id: String, cancel: Arc<AtomicBool>, thread: JoinHandle<()>) -> Self {
        Self {
            id,
            cancel: Some(cancel),
            thread: Some(thread),
        }
    }

    /// Handle carrying only an id, with no worker behind it
    pub fn detached(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cancel: None,
            thread: None,
        }
    }

    /// Opaque worker id; meaningless outside this process
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the worker thread is still running
    pub fn is_alive(&self) -> bool {
        self.thread
            .as_ref()
            .map(|thread| !thread.is_finished())
            .unwrap_or(false)
    }

    /// Ask the worker to exit without waiting for it
    pub fn signal(&self) {
        if let Some(cancel) = &self.cancel {
            cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Signal the worker and wait for it to exit. Always succeeds: handles
    /// that are detached, stale, or already stopped simply do nothing.
    pub fn stop(mut self) {
        self.signal();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
