use serde::{Deserialize, Deserializer, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app_dirs::AppDirs;
use crate::error::PreferencesError;
use crate::theme::Theme;

/// Everything the app remembers between runs: the theme, nothing else.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Theme,
}

fn lenient_theme<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Theme, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Theme::from_saved(&raw))
}

pub trait PreferenceStore {
    fn load(&self) -> Preferences;
    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError>;
}

#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::preferences_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FilePreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preferences {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(prefs) = serde_json::from_slice::<Preferences>(&bytes) {
                return prefs;
            }
        }
        Preferences::default()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let io_err = |source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(prefs)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

/// Store that keeps preferences in memory. Clones share the same slot, so a
/// caller can hand one to the app and inspect what was saved afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    prefs: Rc<RefCell<Preferences>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs: Rc::new(RefCell::new(prefs)),
            saves: Rc::new(Cell::new(0)),
        }
    }

    pub fn saved(&self) -> Preferences {
        *self.prefs.borrow()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preferences {
        *self.prefs.borrow()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        *self.prefs.borrow_mut() = *prefs;
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryPreferenceStore::default();
        let handle = store.clone();
        store
            .save(&Preferences {
                theme: Theme::Light,
            })
            .unwrap();
        assert_eq!(handle.saved().theme, Theme::Light);
        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.load().theme, Theme::Light);
    }

    #[test]
    fn default_store_uses_the_config_dir() {
        let store = FilePreferenceStore::default();
        assert_eq!(store.path(), AppDirs::preferences_path());
        assert_eq!(store.path(), FilePreferenceStore::new().path());
    }

    #[test]
    fn missing_file_defaults_to_dark() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::with_path(dir.path().join("preferences.json"));
        assert_eq!(store.load().theme, Theme::Dark);
    }

    #[test]
    fn roundtrip_light_theme() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let store = FilePreferenceStore::with_path(&path);
        let prefs = Preferences {
            theme: Theme::Light,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load(), prefs);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"theme\": \"light\""));
    }

    #[test]
    fn garbage_file_defaults_to_dark() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, b"{not json").unwrap();
        let store = FilePreferenceStore::with_path(&path);
        assert_eq!(store.load().theme, Theme::Dark);
    }

    #[test]
    fn unknown_theme_name_reads_as_light() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, br#"{"theme":"sepia"}"#).unwrap();
        let store = FilePreferenceStore::with_path(&path);
        assert_eq!(store.load().theme, Theme::Light);
    }

    #[test]
    fn empty_object_defaults_to_dark() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, b"{}").unwrap();
        let store = FilePreferenceStore::with_path(&path);
        assert_eq!(store.load().theme, Theme::Dark);
    }

    #[test]
    fn save_into_unwritable_location_reports_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();
        let store = FilePreferenceStore::with_path(blocker.join("preferences.json"));
        let err = store.save(&Preferences::default()).unwrap_err();
        assert!(matches!(err, PreferencesError::Io { .. }));
    }
}
