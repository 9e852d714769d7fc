//! Online/offline tracking.
//!
//! The host environment feeds discrete transition events into the monitor;
//! there is no polling. The monitor is advisory for the submit affordance —
//! the authoritative gate is the submission precondition in the session.

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the device currently has connectivity.
///
/// Starts online. The flag is atomic only so a host event callback may flip
/// it from another thread; all session logic stays on the main event thread.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    online: AtomicBool,
}

impl ConnectivityMonitor {
    /// Create a monitor that assumes the device is online.
    pub fn new() -> Self {
        Self::with_state(true)
    }

    /// Create a monitor with an explicit initial state.
    pub fn with_state(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    /// Whether the device is currently online.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Notification from the host environment: connectivity restored.
    pub fn went_online(&self) {
        if !self.online.swap(true, Ordering::Relaxed) {
            tracing::debug!("Connectivity restored");
        }
    }

    /// Notification from the host environment: connectivity lost.
    pub fn went_offline(&self) {
        if self.online.swap(false, Ordering::Relaxed) {
            tracing::debug!("Connectivity lost");
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}
