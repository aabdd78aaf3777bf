//! Persisted user preference — the practice software the user works in.
//!
//! Stored as JSON in the platform config directory:
//!   macOS:   ~/Library/Application Support/snelterecht/preferences.json
//!   Linux:   ~/.config/snelterecht/preferences.json
//!   Windows: %APPDATA%/snelterecht/preferences.json
//!
//! The settings window writes it; the capture pipeline only reads it, once per
//! trigger, and tolerates a missing or broken file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_software: Option<String>,
}

/// Default location of the preferences file.
pub fn preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snelterecht")
        .join("preferences.json")
}

pub struct PreferenceStore {
    path: PathBuf,
    // Serializes writers; readers go straight to disk.
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort read of the stored software. Any failure reads as unset.
    pub fn selected_software(&self) -> Option<String> {
        match self.load() {
            Ok(prefs) => prefs.selected_software.filter(|s| !s.trim().is_empty()),
            Err(PreferenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("[PREFS] Could not read {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn set_selected_software(&self, software: &str) -> Result<(), PreferenceError> {
        let software = software.trim();
        if software.is_empty() {
            return Err(PreferenceError::EmptyValue);
        }

        let _guard = self.write_lock.lock().map_err(|_| PreferenceError::Poisoned)?;
        let mut prefs = match self.load() {
            Ok(prefs) => prefs,
            Err(PreferenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                StoredPreferences::default()
            }
            Err(e) => {
                log::warn!("[PREFS] Overwriting unreadable preferences: {}", e);
                StoredPreferences::default()
            }
        };
        prefs.selected_software = Some(software.to_string());

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&prefs)?;
        std::fs::write(&self.path, json)?;

        log::info!("[PREFS] Selected software set to '{}'", software);
        Ok(())
    }

    fn load(&self) -> Result<StoredPreferences, PreferenceError> {
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference value must not be empty")]
    EmptyValue,

    #[error("Preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preference store lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scratch_path() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        std::env::temp_dir()
            .join(format!(
                "snelterecht-prefs-{}-{}",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::SeqCst)
            ))
            .join("preferences.json")
    }

    #[test]
    fn default_path_is_under_snelterecht() {
        let path = preferences_path();
        let s = path.to_string_lossy();
        assert!(s.contains("snelterecht"));
        assert!(s.ends_with("preferences.json"));
    }

    #[test]
    fn missing_file_reads_as_unset() {
        let store = PreferenceStore::new(scratch_path());
        assert_eq!(store.selected_software(), None);
    }

    #[test]
    fn written_value_reads_back() {
        let store = PreferenceStore::new(scratch_path());
        store.set_selected_software("oase").unwrap();
        assert_eq!(store.selected_software().as_deref(), Some("oase"));

        store.set_selected_software("simplex").unwrap();
        assert_eq!(store.selected_software().as_deref(), Some("simplex"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"selectedSoftware\""));
    }

    #[test]
    fn empty_value_is_rejected() {
        let store = PreferenceStore::new(scratch_path());
        assert!(matches!(
            store.set_selected_software("  "),
            Err(PreferenceError::EmptyValue)
        ));
    }

    #[test]
    fn corrupt_file_reads_as_unset_and_is_repaired_on_write() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let store = PreferenceStore::new(&path);
        assert_eq!(store.selected_software(), None);

        store.set_selected_software("novadent").unwrap();
        assert_eq!(store.selected_software().as_deref(), Some("novadent"));
    }
}
