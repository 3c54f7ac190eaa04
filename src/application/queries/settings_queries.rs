//! Settings Queries

/// 读取用户设置
#[derive(Debug, Clone, Default)]
pub struct GetSettings;
