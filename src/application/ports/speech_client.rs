//! Speech Client Port - 语音合成客户端抽象
//!
//! 对应云端语音服务的 config/synthesizer 两级句柄，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::synthesis::Credentials;
use crate::domain::voice::VoiceDescriptor;

use super::AudioSinkPort;

/// 语音服务错误
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Invalid speech configuration: {0}")]
    Configuration(String),

    #[error("Authentication rejected: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Audio resource error: {0}")]
    Resource(String),

    /// 请求在完成前被取消
    #[error("Request canceled")]
    Canceled,
}

/// 合成配置句柄
///
/// 由 `SpeechClientFactoryPort::create_config` 创建，凭据已校验
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    credentials: Credentials,
    voice_name: Option<String>,
}

impl SpeechConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            voice_name: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn voice_name(&self) -> Option<&str> {
        self.voice_name.as_deref()
    }

    pub fn set_voice_name(&mut self, voice_name: Option<String>) {
        self.voice_name = voice_name.filter(|v| !v.trim().is_empty());
    }
}

/// 合成输出
pub enum AudioOutput {
    /// 默认播放设备
    Device,
    /// 推送式字节接收端
    Sink(Box<dyn AudioSinkPort>),
    /// 不输出音频（只用于获取音色列表）
    Null,
}

impl fmt::Debug for AudioOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "Device"),
            Self::Sink(_) => write!(f, "Sink"),
            Self::Null => write!(f, "Null"),
        }
    }
}

/// 合成结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisReason {
    Completed,
    Canceled,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub reason: SynthesisReason,
    /// 已交付给输出端的音频字节数
    pub audio_bytes: u64,
}

impl SynthesisResult {
    pub fn completed(audio_bytes: u64) -> Self {
        Self {
            reason: SynthesisReason::Completed,
            audio_bytes,
        }
    }

    pub fn canceled(audio_bytes: u64) -> Self {
        Self {
            reason: SynthesisReason::Canceled,
            audio_bytes,
        }
    }
}

/// Synthesizer Port - 合成客户端句柄
///
/// `cancel` 只发出取消信号，不等待确认。`dispose` 释放输出端，之后不会再有字节写出；
/// 进行中的 `speak` 会以 `Canceled` 结束。
#[async_trait]
pub trait SynthesizerPort: Send + Sync {
    /// 合成并输出文本
    async fn speak(&self, text: &str) -> Result<SynthesisResult, SpeechError>;

    /// 获取可用音色
    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError>;

    /// 请求取消进行中的合成
    fn cancel(&self);

    /// 释放资源
    fn dispose(&self);
}

/// Speech Client Factory Port
///
/// 外部语音服务的客户端工厂
pub trait SpeechClientFactoryPort: Send + Sync {
    /// 校验凭据并创建配置句柄
    fn create_config(&self, credentials: &Credentials) -> Result<SpeechConfig, SpeechError>;

    /// 创建合成客户端
    fn create_synthesizer(
        &self,
        config: &SpeechConfig,
        output: AudioOutput,
    ) -> Result<Arc<dyn SynthesizerPort>, SpeechError>;
}
