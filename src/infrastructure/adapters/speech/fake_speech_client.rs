//! Fake Speech Client - 用于测试和离线运行的语音客户端
//!
//! 不访问网络：返回固定音色列表，把固定音频分块推送到输出端，
//! 并记录每个 synthesizer 的创建/取消/释放顺序。

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    AudioOutput, SpeechClientFactoryPort, SpeechConfig, SpeechError, SynthesisResult,
    SynthesizerPort,
};
use crate::domain::synthesis::Credentials;
use crate::domain::voice::VoiceDescriptor;

/// Fake Speech Client 配置
#[derive(Debug, Clone)]
pub struct FakeSpeechClientConfig {
    /// 固定返回的音色
    pub voices: Vec<VoiceDescriptor>,
    /// 固定返回的音频
    pub audio: Vec<u8>,
    /// 每次推送的字节数
    pub chunk_size: usize,
    /// 每块之间的延迟，设备输出时为整体播放时长
    pub chunk_delay: Duration,
    /// 设置后 speak 返回服务错误
    pub speak_error: Option<String>,
    /// 设置后 list_voices 返回服务错误
    pub list_error: Option<String>,
}

impl Default for FakeSpeechClientConfig {
    fn default() -> Self {
        Self {
            voices: vec![
                VoiceDescriptor::new("en-US-JennyNeural", "en-US"),
                VoiceDescriptor::new("en-US-GuyNeural", "en-US"),
                VoiceDescriptor::new("fr-FR-DeniseNeural", "fr-FR"),
            ],
            audio: silent_wav(200, 16000),
            chunk_size: 1024,
            chunk_delay: Duration::from_millis(10),
            speak_error: None,
            list_error: None,
        }
    }
}

/// 生成一段静音的 16-bit 单声道 WAV
pub fn silent_wav(duration_ms: u32, sample_rate: u32) -> Vec<u8> {
    let samples = sample_rate as u64 * duration_ms as u64 / 1000;
    let data_len = (samples * 2) as u32;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

/// 生命周期事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeEvent {
    Created(usize),
    Canceled(usize),
    Disposed(usize),
}

type EventLog = Arc<Mutex<Vec<FakeEvent>>>;

fn lock_log(log: &EventLog) -> MutexGuard<'_, Vec<FakeEvent>> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fake Speech Client
pub struct FakeSpeechClient {
    config: Arc<FakeSpeechClientConfig>,
    next_id: AtomicUsize,
    log: EventLog,
}

impl FakeSpeechClient {
    pub fn new(config: FakeSpeechClientConfig) -> Self {
        tracing::info!(
            voices = config.voices.len(),
            audio_size = config.audio.len(),
            "FakeSpeechClient initialized"
        );
        Self {
            config: Arc::new(config),
            next_id: AtomicUsize::new(1),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeSpeechClientConfig::default())
    }

    /// 按发生顺序返回所有生命周期事件
    pub fn events(&self) -> Vec<FakeEvent> {
        lock_log(&self.log).clone()
    }

    pub fn created_count(&self) -> usize {
        self.count(|e| matches!(e, FakeEvent::Created(_)))
    }

    pub fn disposed_count(&self) -> usize {
        self.count(|e| matches!(e, FakeEvent::Disposed(_)))
    }

    fn count(&self, pred: impl Fn(&FakeEvent) -> bool) -> usize {
        lock_log(&self.log).iter().filter(|e| pred(e)).count()
    }
}

impl SpeechClientFactoryPort for FakeSpeechClient {
    fn create_config(&self, credentials: &Credentials) -> Result<SpeechConfig, SpeechError> {
        credentials
            .validate()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;
        Ok(SpeechConfig::new(credentials.clone()))
    }

    fn create_synthesizer(
        &self,
        config: &SpeechConfig,
        output: AudioOutput,
    ) -> Result<Arc<dyn SynthesizerPort>, SpeechError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock_log(&self.log).push(FakeEvent::Created(id));
        tracing::debug!(
            synthesizer = id,
            voice = ?config.voice_name(),
            output = ?output,
            "FakeSpeechClient: synthesizer created"
        );
        Ok(Arc::new(FakeSynthesizer {
            id,
            config: self.config.clone(),
            output: Mutex::new(Some(output)),
            cancel: CancellationToken::new(),
            log: self.log.clone(),
        }))
    }
}

struct FakeSynthesizer {
    id: usize,
    config: Arc<FakeSpeechClientConfig>,
    output: Mutex<Option<AudioOutput>>,
    cancel: CancellationToken,
    log: EventLog,
}

enum ChunkWrite {
    Accepted(usize),
    Device,
    Released,
}

impl FakeSynthesizer {
    fn write_chunk(&self, chunk: &[u8]) -> ChunkWrite {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        match output.as_mut() {
            Some(AudioOutput::Sink(sink)) => ChunkWrite::Accepted(sink.write(chunk)),
            Some(AudioOutput::Device) => ChunkWrite::Device,
            Some(AudioOutput::Null) => ChunkWrite::Accepted(chunk.len()),
            None => ChunkWrite::Released,
        }
    }

    /// 等待一个延迟，被取消时返回 false
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

#[async_trait]
impl SynthesizerPort for FakeSynthesizer {
    async fn speak(&self, text: &str) -> Result<SynthesisResult, SpeechError> {
        tracing::debug!(
            synthesizer = self.id,
            text_len = text.len(),
            "FakeSpeechClient: speaking"
        );

        if let Some(message) = &self.config.speak_error {
            return Err(SpeechError::Service {
                status: 500,
                message: message.clone(),
            });
        }

        let mut total = 0u64;
        for chunk in self.config.audio.chunks(self.config.chunk_size.max(1)) {
            if !self.pause(self.config.chunk_delay).await {
                return Ok(SynthesisResult::canceled(total));
            }
            match self.write_chunk(chunk) {
                ChunkWrite::Accepted(n) if n < chunk.len() => {
                    return Err(SpeechError::Resource(format!(
                        "audio sink accepted {} of {} bytes",
                        n,
                        chunk.len()
                    )));
                }
                ChunkWrite::Accepted(n) => total += n as u64,
                ChunkWrite::Device => total += chunk.len() as u64,
                ChunkWrite::Released => return Ok(SynthesisResult::canceled(total)),
            }
        }

        Ok(SynthesisResult::completed(total))
    }

    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError> {
        if let Some(message) = &self.config.list_error {
            return Err(SpeechError::Service {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(self.config.voices.clone())
    }

    fn cancel(&self) {
        lock_log(&self.log).push(FakeEvent::Canceled(self.id));
        self.cancel.cancel();
    }

    fn dispose(&self) {
        lock_log(&self.log).push(FakeEvent::Disposed(self.id));
        self.cancel.cancel();
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
