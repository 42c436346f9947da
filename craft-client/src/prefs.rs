//! Preference store
//!
//! Small key/value string store surviving restarts. The catalog only keeps
//! the wishlist here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preference store lock poisoned")]
    Poisoned,
}

impl From<PrefsError> for AppError {
    fn from(err: PrefsError) -> Self {
        let code = match err {
            PrefsError::Json(_) => ErrorCode::StorageCorrupted,
            PrefsError::Io(_) | PrefsError::Poisoned => ErrorCode::PreferencesUnavailable,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Key/value preference storage
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Preferences kept in a JSON object on disk.
///
/// The file is read once when opened and rewritten on every `set`.
#[derive(Debug)]
pub struct FilePreferenceStore {
    file_path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let file_path = path.as_ref().to_path_buf();
        let data = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            file_path,
            data: Mutex::new(data),
        })
    }

    /// Like [`open`](Self::open), but an unparseable file is moved aside
    /// to `<name>.corrupt` and the store starts empty
    pub fn open_or_reset(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let file_path = path.as_ref().to_path_buf();
        match Self::open(&file_path) {
            Err(PrefsError::Json(e)) => {
                let mut quarantine = file_path.clone().into_os_string();
                quarantine.push(".corrupt");
                tracing::warn!(
                    path = %file_path.display(),
                    error = %e,
                    "Preferences file is corrupted, starting empty"
                );
                std::fs::rename(&file_path, &quarantine)?;
                Ok(Self {
                    file_path,
                    data: Mutex::new(HashMap::new()),
                })
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn save(&self, data: &HashMap<String, String>) -> Result<(), PrefsError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let data = self.data.lock().map_err(|_| PrefsError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut data = self.data.lock().map_err(|_| PrefsError::Poisoned)?;
        data.insert(key.to_string(), value.to_string());
        self.save(&data)
    }
}

/// In-memory preferences, lost on drop
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        let data = self.data.lock().map_err(|_| PrefsError::Poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut data = self.data.lock().map_err(|_| PrefsError::Poisoned)?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
