//! Persistence Layer - 数据持久化
//!
//! 用户设置的 JSON 文件存储

mod json_settings_store;

pub use json_settings_store::JsonSettingsStore;
