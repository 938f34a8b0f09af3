use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::classify::ClassifySettings;

const CONFIG_FILE: &str = "config.json";

/// User-facing settings. Persisted as JSON; missing or corrupt files fall
/// back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Classify gestures performed with two or more fingers as their
    /// double-finger variants.
    pub double_actions_enabled: bool,
    /// Classify gestures within the edge bands as edge variants.
    pub edge_actions_enabled: bool,
    /// Launch immediately when a filter pass leaves exactly one candidate
    /// while browsing.
    pub search_auto_launch: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            double_actions_enabled: false,
            edge_actions_enabled: false,
            search_auto_launch: false,
        }
    }
}

impl LauncherConfig {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            warn!("no config directory, using default settings");
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(err) => {
                    warn!("failed to parse config {path:?}: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let Some(path) = config_path() else {
            return Err("cannot determine config directory".into());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
        let payload = serde_json::to_string_pretty(self).map_err(|err| err.to_string())?;
        fs::write(&path, payload).map_err(|err| err.to_string())?;
        debug!("wrote config {path:?}");
        Ok(())
    }

    /// The per-classification settings snapshot.
    pub fn classify_settings(&self) -> ClassifySettings {
        ClassifySettings {
            double_actions_enabled: self.double_actions_enabled,
            edge_actions_enabled: self.edge_actions_enabled,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("ungrid").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = LauncherConfig::default();
        assert!(!config.double_actions_enabled);
        assert!(!config.edge_actions_enabled);
        assert!(!config.search_auto_launch);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: LauncherConfig =
            serde_json::from_str(r#"{"edge_actions_enabled": true}"#).unwrap();
        assert!(config.edge_actions_enabled);
        assert!(!config.double_actions_enabled);
    }
}
