//! Rodio Playback - 基于 rodio 的默认设备播放
//!
//! rodio 的输出流不能跨线程移动，每次播放都在阻塞线程里打开设备、解码并等待结束。

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioPlaybackPort, PlaybackError};

/// 轮询取消信号的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 默认输出设备播放器
#[derive(Debug, Clone, Default)]
pub struct RodioPlayback;

impl RodioPlayback {
    pub fn new() -> Self {
        Self
    }
}

fn play_blocking(audio: Vec<u8>, cancel: CancellationToken) -> Result<(), PlaybackError> {
    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| PlaybackError::NoDevice(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| PlaybackError::Playback(e.to_string()))?;
    let source = Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::Decode(e.to_string()))?;
    sink.append(source);

    tracing::debug!("Audio playback started");
    while !sink.empty() {
        if cancel.is_cancelled() {
            sink.stop();
            tracing::debug!("Audio playback stopped");
            return Ok(());
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    tracing::debug!("Playback finished naturally");
    Ok(())
}

#[async_trait]
impl AudioPlaybackPort for RodioPlayback {
    async fn play(&self, audio: Vec<u8>, cancel: CancellationToken) -> Result<(), PlaybackError> {
        if cancel.is_cancelled() {
            return Ok(());
        }
        tokio::task::spawn_blocking(move || play_blocking(audio, cancel))
            .await
            .map_err(|e| PlaybackError::Playback(e.to_string()))?
    }
}
