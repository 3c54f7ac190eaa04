//! JSON Settings Store - 用户设置文件
//!
//! 实现 SettingsStorePort，整体读写一个 JSON 文件

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::ports::{SettingsError, SettingsStorePort, UserSettings};

/// JSON 文件设置存储
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 设置文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStorePort for JsonSettingsStore {
    fn load(&self) -> Result<UserSettings, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "Settings file not found, using defaults");
                return Ok(UserSettings::default());
            }
            Err(e) => return Err(SettingsError::Io(e.to_string())),
        };

        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| SettingsError::Parse(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| SettingsError::Io(e.to_string()))?;

        tracing::debug!(path = ?self.path, "Settings saved");
        Ok(())
    }
}
