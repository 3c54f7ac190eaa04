//! Voice Catalog Port - 音色目录状态

use thiserror::Error;

use crate::domain::voice::{LocaleFilter, VoiceDescriptor};

/// 目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),
}

/// 目录刷新摘要
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub voice_count: usize,
    pub locales: Vec<LocaleFilter>,
    pub active_filter: LocaleFilter,
    pub selected_voice: Option<String>,
}

/// Voice Catalog Port
///
/// 持有最近一次成功获取的音色列表以及当前的过滤器与选中音色
pub trait VoiceCatalogPort: Send + Sync {
    /// 整体替换音色列表，重置过滤器为 All、选中音色为第一个
    fn replace(&self, voices: Vec<VoiceDescriptor>) -> CatalogSnapshot;

    /// 区域过滤器列表（首项为 All）
    fn locales(&self) -> Vec<LocaleFilter>;

    fn active_filter(&self) -> LocaleFilter;

    fn set_filter(&self, filter: LocaleFilter) -> Result<(), CatalogError>;

    fn selected_voice(&self) -> Option<VoiceDescriptor>;

    fn select_voice(&self, name: &str) -> Result<VoiceDescriptor, CatalogError>;

    /// 按过滤器投影；None 使用当前过滤器
    fn filtered_voices(&self, filter: Option<&LocaleFilter>) -> Vec<VoiceDescriptor>;

    fn voice_count(&self) -> usize;
}
