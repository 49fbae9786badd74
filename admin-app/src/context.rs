use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use api_client::Backend;

use crate::notify::Notifier;
use crate::storage::Storage;

/// Global busy flag. Show and hide are not reference-counted; the last call
/// wins, so overlapping loads hide the indicator as soon as any one of them
/// finishes.
#[derive(Debug, Default)]
pub struct LoadingGate {
    visible: AtomicBool,
}

impl LoadingGate {
    pub fn show(&self) {
        self.visible.store(true, Ordering::Relaxed);
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::Relaxed);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }
}

/// Everything a page controller needs, threaded explicitly instead of being
/// reached through globals.
pub struct AppContext {
    pub backend: Arc<dyn Backend>,
    pub notifier: Notifier,
    pub loading: LoadingGate,
    pub storage: Storage,
}

impl AppContext {
    pub fn new(backend: Arc<dyn Backend>, storage: Storage) -> Self {
        Self {
            backend,
            notifier: Notifier::default(),
            loading: LoadingGate::default(),
            storage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_gate_last_call_wins() {
        let gate = LoadingGate::default();
        assert!(!gate.is_visible());
        gate.show();
        gate.show();
        assert!(gate.is_visible());
        gate.hide();
        assert!(!gate.is_visible());
    }
}
