use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::models::AppEntry;

/// Host surface for package enumeration. Called on cold start and again on
/// install/uninstall broadcasts.
pub trait AppSource: Send + Sync {
    fn list_installed_apps(&self) -> Vec<AppEntry>;
}

/// The authoritative app list, shared process-wide as an immutable
/// snapshot. A rebuild produces a complete new list off-thread and swaps it
/// in as a single `Arc` replacement, so readers never observe a partially
/// rebuilt list. Clones share the same underlying snapshot.
#[derive(Clone, Default)]
pub struct AppIndex {
    snapshot: Arc<Mutex<Arc<Vec<AppEntry>>>>,
}

impl AppIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot. Cheap: clones the `Arc`, not the list.
    pub fn snapshot(&self) -> Arc<Vec<AppEntry>> {
        self.snapshot.lock().unwrap().clone()
    }

    /// Swap in a freshly built list.
    pub fn replace(&self, apps: Vec<AppEntry>) {
        debug!("app index replaced, {} entries", apps.len());
        *self.snapshot.lock().unwrap() = Arc::new(apps);
    }

    /// Rebuild the index from the host's package enumeration on a blocking
    /// worker, then swap the result in.
    pub async fn rebuild(&self, source: Arc<dyn AppSource>) {
        let task = tokio::task::spawn_blocking(move || build_list(source.as_ref()));
        match task.await {
            Ok(apps) => self.replace(apps),
            Err(err) => warn!("app index rebuild failed: {err}"),
        }
    }
}

/// Enumerate, dedupe by (package, user) and sort by case-folded label. The
/// resulting order is the authoritative order the filter preserves.
fn build_list(source: &dyn AppSource) -> Vec<AppEntry> {
    let mut apps = source.list_installed_apps();

    let mut seen: HashSet<(String, Option<u32>)> = HashSet::new();
    apps.retain(|app| seen.insert((app.package.to_ascii_lowercase(), app.user)));
    apps.sort_by(|a, b| a.label.to_lowercase().cmp(&b.label.to_lowercase()));

    debug!("indexed {} apps", apps.len());
    apps
}
