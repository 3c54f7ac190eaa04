//! 应用层错误定义
//!
//! 统一的命令/查询错误类型。所有操作的失败都在处理器边界转换为此类型，交给调用方展示。

use thiserror::Error;

use crate::application::ports::{
    CatalogError, PlaybackError, SessionError, SettingsError, SpeechError,
};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 凭据缺失或无效，发生在任何网络调用之前
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 验证错误（如输出目录不存在）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误（认证、超时、服务端错误）
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 音频设备或输出目标获取失败
    #[error("Resource error: {0}")]
    ResourceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError(message.into())
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Configuration(msg) => Self::ConfigurationError(msg),
            SpeechError::Resource(msg) => Self::ResourceError(msg),
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<SessionError> for ApplicationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Build(inner) => inner.into(),
        }
    }
}

impl From<PlaybackError> for ApplicationError {
    fn from(err: PlaybackError) -> Self {
        Self::ResourceError(err.to_string())
    }
}

impl From<CatalogError> for ApplicationError {
    fn from(err: CatalogError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<SettingsError> for ApplicationError {
    fn from(err: SettingsError) -> Self {
        Self::StorageError(err.to_string())
    }
}
