use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::models::{Action, Gesture};

const BINDINGS_FILE: &str = "bindings.json";

/// Persisted gesture-to-action associations, keyed by the gesture's stable
/// string encoding. Corrupt or unknown values decode to "absent".
pub trait BindingStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn iterate(&self) -> Vec<(String, String)>;
}

/// Store a binding.
pub fn bind(store: &mut dyn BindingStore, gesture: Gesture, action: &Action) {
    debug!("binding {} -> {}", gesture, action.encode());
    store.set(&gesture.key(), &action.encode());
}

/// All well-formed bindings currently in the store. Entries whose key or
/// value fail to decode are skipped with a warning, never an error.
pub fn snapshot(store: &dyn BindingStore) -> Vec<(Gesture, Action)> {
    let mut out = Vec::new();
    for (key, value) in store.iterate() {
        let Some(gesture) = Gesture::from_key(&key) else {
            warn!("skipping binding with unknown gesture key {key:?}");
            continue;
        };
        let Some(action) = Action::decode(&value) else {
            warn!("skipping corrupt binding {key:?} -> {value:?}");
            continue;
        };
        out.push((gesture, action));
    }
    out
}

/// In-memory store, used by tests and as a fallback when no config
/// directory is available.
#[derive(Debug, Default)]
pub struct MemoryBindings {
    entries: BTreeMap<String, String>,
}

impl MemoryBindings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BindingStore for MemoryBindings {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn iterate(&self) -> Vec<(String, String)> {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// JSON-file-backed store. Every mutation is written through immediately;
/// a write failure is logged and the in-memory state stays authoritative
/// until the next successful write.
#[derive(Debug)]
pub struct JsonBindings {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl JsonBindings {
    /// Load bindings from the default config location. Missing or corrupt
    /// files start empty.
    pub fn load() -> Self {
        let path = default_path();
        let entries = match &path {
            Some(path) => match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(entries) => entries,
                    Err(err) => {
                        warn!("failed to parse bindings {path:?}: {err}");
                        BTreeMap::new()
                    }
                },
                Err(_) => BTreeMap::new(),
            },
            None => {
                warn!("no config directory, bindings will not persist");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };
        let write = || -> Result<(), String> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|err| err.to_string())?;
            }
            let payload =
                serde_json::to_string_pretty(&self.entries).map_err(|err| err.to_string())?;
            fs::write(path, payload).map_err(|err| err.to_string())
        };
        match write() {
            Ok(()) => debug!("wrote bindings {path:?}"),
            Err(err) => warn!("failed to write bindings {path:?}: {err}"),
        }
    }
}

impl BindingStore for JsonBindings {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn iterate(&self) -> Vec<(String, String)> {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

fn default_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("ungrid").join(BINDINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseGesture, PickerIntention};

    #[test]
    fn bind_and_snapshot_round_trip() {
        let mut store = MemoryBindings::new();
        let gesture = Gesture::new(BaseGesture::SwipeUp);
        let action = Action::OpenPicker(PickerIntention::View);

        bind(&mut store, gesture, &action);
        assert_eq!(store.get("swipe_up").as_deref(), Some("picker:view"));
        assert_eq!(snapshot(&store), vec![(gesture, action)]);
    }

    #[test]
    fn snapshot_skips_corrupt_entries() {
        let mut store = MemoryBindings::new();
        store.set("swipe_up", "picker:view");
        store.set("swipe_down", "intent:warp_drive");
        store.set("not_a_gesture", "picker:view");

        let entries = snapshot(&store);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, Gesture::new(BaseGesture::SwipeUp));
    }

    #[test]
    fn rebinding_overwrites() {
        let mut store = MemoryBindings::new();
        let gesture = Gesture::new(BaseGesture::DoubleTap);
        bind(&mut store, gesture, &Action::SystemIntent(crate::models::SystemIntentKind::LockScreen));
        bind(&mut store, gesture, &Action::Unbound);
        assert_eq!(store.get("double_tap").as_deref(), Some(""));
        assert_eq!(snapshot(&store), vec![(gesture, Action::Unbound)]);
    }
}
