//! Catalog Commands - 音色目录刷新与选择

use crate::domain::synthesis::Credentials;
use crate::domain::voice::LocaleFilter;

/// 刷新音色目录
#[derive(Debug, Clone)]
pub struct RefreshCatalogCommand {
    pub credentials: Credentials,
}

/// 切换区域过滤器
#[derive(Debug, Clone)]
pub struct SelectLocaleCommand {
    pub filter: LocaleFilter,
}

/// 选择音色
#[derive(Debug, Clone)]
pub struct SelectVoiceCommand {
    pub voice_name: String,
}
