//! Settings Store Port - 用户设置持久化

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::synthesis::Credentials;

/// 设置存储错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse settings: {0}")]
    Parse(String),
}

/// 用户设置
///
/// JSON 字段使用 camelCase，缺失字段取默认值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub speech_key: String,
    pub speech_region: String,
    pub auto_generate_file_name: bool,
    pub auto_open_file_folder_after_downloading: bool,
    pub save_to: String,
}

impl UserSettings {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.speech_key.clone(), self.speech_region.clone())
    }

    /// 保存目录；空字符串表示未配置
    pub fn save_dir(&self) -> Option<PathBuf> {
        let trimmed = self.save_to.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

/// Settings Store Port
pub trait SettingsStorePort: Send + Sync {
    /// 读取设置，文件不存在时返回默认值
    fn load(&self) -> Result<UserSettings, SettingsError>;

    /// 整体保存
    fn save(&self, settings: &UserSettings) -> Result<(), SettingsError>;
}
