use std::sync::{Arc, Mutex};

use crate::bindings::{BindingStore, MemoryBindings};
use crate::classify::PointerDebounce;
use crate::config::LauncherConfig;
use crate::indexer::AppIndex;

/// Process-wide launcher state.
///
/// Classification, resolution and dispatch run on the thread that owns
/// input events; the app index is the only piece rebuilt off-thread, and it
/// is handed over as an atomic snapshot swap (see [`AppIndex`]).
#[derive(Clone)]
pub struct LauncherState {
    pub config: Arc<Mutex<LauncherConfig>>,
    pub app_index: AppIndex,
    pub bindings: Arc<Mutex<Box<dyn BindingStore + Send>>>,
    pub pointer_debounce: Arc<Mutex<PointerDebounce>>,
}

impl LauncherState {
    pub fn new(bindings: Box<dyn BindingStore + Send>) -> Self {
        Self {
            config: Arc::new(Mutex::new(LauncherConfig::default())),
            app_index: AppIndex::new(),
            bindings: Arc::new(Mutex::new(bindings)),
            pointer_debounce: Arc::new(Mutex::new(PointerDebounce::new())),
        }
    }

    /// In-memory state for tests and hosts without persistence.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBindings::new()))
    }

    pub fn config_snapshot(&self) -> LauncherConfig {
        self.config.lock().unwrap().clone()
    }
}
