//! Settings Commands

/// 修改用户设置，None 字段保持不变
#[derive(Debug, Clone, Default)]
pub struct UpdateSettingsCommand {
    pub speech_key: Option<String>,
    pub speech_region: Option<String>,
    pub auto_generate_file_name: Option<bool>,
    pub auto_open_file_folder_after_downloading: Option<bool>,
    pub save_to: Option<String>,
}
