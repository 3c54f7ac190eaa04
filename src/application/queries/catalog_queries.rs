//! Catalog Queries

use crate::domain::voice::LocaleFilter;

/// 列出区域过滤器（首项为 All）
#[derive(Debug, Clone, Default)]
pub struct ListLocales;

/// 列出音色；filter 为 None 时使用当前过滤器
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    pub filter: Option<LocaleFilter>,
}

/// 当前过滤器与选中音色
#[derive(Debug, Clone, Default)]
pub struct GetSelection;
