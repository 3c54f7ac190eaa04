//! Audio Playback Port - 本地设备播放

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No output device: {0}")]
    NoDevice(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Playback error: {0}")]
    Playback(String),
}

/// Audio Playback Port
#[async_trait]
pub trait AudioPlaybackPort: Send + Sync {
    /// 播放编码后的音频（WAV），播放完毕或被取消时返回
    async fn play(&self, audio: Vec<u8>, cancel: CancellationToken) -> Result<(), PlaybackError>;
}
