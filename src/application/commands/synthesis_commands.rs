//! Synthesis Commands - 播放、下载与停止

use std::path::PathBuf;

use crate::application::ports::UserSettings;
use crate::domain::synthesis::{Credentials, SessionOutcome};

/// 播放命令 - 合成并输出到默认设备
#[derive(Debug, Clone)]
pub struct PlayCommand {
    pub credentials: Credentials,
    pub text: String,
    pub voice_name: Option<String>,
}

/// 播放响应
#[derive(Debug, Clone)]
pub struct PlayResponse {
    pub session_id: String,
    pub outcome: SessionOutcome,
    pub audio_bytes: u64,
}

/// 下载命令 - 合成并写入文件
#[derive(Debug, Clone)]
pub struct DownloadCommand {
    pub credentials: Credentials,
    pub text: String,
    pub voice_name: Option<String>,
    pub auto_generate_file_name: bool,
    /// 配置的保存目录
    pub save_to: Option<PathBuf>,
    /// 关闭自动命名时由调用方选择的目标；None 表示放弃下载
    pub destination: Option<PathBuf>,
    pub open_folder: bool,
}

impl DownloadCommand {
    /// 按持久化的用户设置构造
    pub fn from_settings(
        settings: &UserSettings,
        text: impl Into<String>,
        voice_name: Option<String>,
        destination: Option<PathBuf>,
    ) -> Self {
        Self {
            credentials: settings.credentials(),
            text: text.into(),
            voice_name,
            auto_generate_file_name: settings.auto_generate_file_name,
            save_to: settings.save_dir(),
            destination,
            open_folder: settings.auto_open_file_folder_after_downloading,
        }
    }
}

/// 下载响应
#[derive(Debug, Clone)]
pub enum DownloadResponse {
    /// 未选择目标文件，什么都没做
    Aborted,
    Saved {
        session_id: String,
        path: PathBuf,
        outcome: SessionOutcome,
        audio_bytes: u64,
        /// 调用方是否应打开所在目录
        open_folder: bool,
    },
}

/// 停止命令
#[derive(Debug, Clone, Default)]
pub struct StopCommand;

/// 停止响应
#[derive(Debug, Clone)]
pub struct StopResponse {
    /// 是否有会话收到取消请求
    pub cancel_requested: bool,
}
