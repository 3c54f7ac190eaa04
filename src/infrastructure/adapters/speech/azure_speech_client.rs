//! Azure Speech Client - 调用 Azure 语音服务 REST API
//!
//! 实现 SpeechClientFactoryPort / SynthesizerPort
//!
//! 外部 API:
//! GET  https://{region}.tts.speech.microsoft.com/cognitiveservices/voices/list
//! POST https://{region}.tts.speech.microsoft.com/cognitiveservices/v1
//!      Body: SSML, Header X-Microsoft-OutputFormat 指定输出格式
//!      Response: 音频二进制（分块流式返回）

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    AudioOutput, AudioPlaybackPort, SpeechClientFactoryPort, SpeechConfig, SpeechError,
    SynthesisResult, SynthesizerPort,
};
use crate::config::SpeechServiceConfig;
use crate::domain::synthesis::Credentials;
use crate::domain::voice::VoiceDescriptor;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const FALLBACK_LANG: &str = "en-US";

/// 音色列表条目 (JSON, PascalCase)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureVoice {
    short_name: String,
    locale: String,
    display_name: Option<String>,
    local_name: Option<String>,
    gender: Option<String>,
    voice_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_sample_rate")]
    sample_rate_hertz: Option<u32>,
}

// 服务端以字符串形式返回采样率
fn deserialize_sample_rate<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u32),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Number(n)) => Some(n),
        None => None,
    })
}

impl From<AzureVoice> for VoiceDescriptor {
    fn from(voice: AzureVoice) -> Self {
        Self {
            name: voice.short_name,
            locale: voice.locale,
            display_name: voice.display_name,
            local_name: voice.local_name,
            gender: voice.gender,
            voice_type: voice.voice_type,
            sample_rate_hertz: voice.sample_rate_hertz,
        }
    }
}

/// Azure 语音客户端配置
#[derive(Debug, Clone)]
pub struct AzureSpeechClientConfig {
    /// 覆盖按 region 拼接的服务地址
    pub endpoint: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 输出音频格式
    pub output_format: String,
    /// 未选择音色时使用的音色
    pub default_voice: String,
    pub user_agent: String,
}

impl Default for AzureSpeechClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 60,
            output_format: "riff-24khz-16bit-mono-pcm".to_string(),
            default_voice: "en-US-JennyNeural".to_string(),
            user_agent: "speechdesk".to_string(),
        }
    }
}

impl From<&SpeechServiceConfig> for AzureSpeechClientConfig {
    fn from(config: &SpeechServiceConfig) -> Self {
        Self {
            endpoint: config
                .endpoint
                .clone()
                .filter(|e| !e.trim().is_empty()),
            timeout_secs: config.timeout_secs,
            output_format: config.output_format.clone(),
            default_voice: config.default_voice.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl AzureSpeechClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Azure 语音客户端（synthesizer 工厂）
pub struct AzureSpeechClient {
    client: Client,
    config: AzureSpeechClientConfig,
    playback: Option<Arc<dyn AudioPlaybackPort>>,
}

impl AzureSpeechClient {
    /// 创建新的客户端
    pub fn new(config: AzureSpeechClientConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            playback: None,
        })
    }

    /// 设置本地播放设备，未设置时 `AudioOutput::Device` 不可用
    pub fn with_playback(mut self, playback: Arc<dyn AudioPlaybackPort>) -> Self {
        self.playback = Some(playback);
        self
    }

    /// 服务基础地址
    fn host(&self, region: &str) -> String {
        match &self.config.endpoint {
            Some(endpoint) => endpoint.trim().trim_end_matches('/').to_string(),
            None => format!("https://{}.tts.speech.microsoft.com", region.trim()),
        }
    }
}

impl SpeechClientFactoryPort for AzureSpeechClient {
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
        if matches!(output, AudioOutput::Device) && self.playback.is_none() {
            return Err(SpeechError::Resource(
                "no audio output device available (build with the `playback` feature)".to_string(),
            ));
        }

        let credentials = config.credentials();
        let voice = config
            .voice_name()
            .unwrap_or(&self.config.default_voice)
            .to_string();

        tracing::debug!(
            region = %credentials.region,
            voice = %voice,
            output = ?output,
            "Creating Azure synthesizer"
        );

        Ok(Arc::new(AzureSynthesizer {
            client: self.client.clone(),
            host: self.host(&credentials.region),
            key: credentials.key.clone(),
            voice,
            output_format: self.config.output_format.clone(),
            user_agent: self.config.user_agent.clone(),
            playback: self.playback.clone(),
            output: Mutex::new(Some(output)),
            cancel: CancellationToken::new(),
        }))
    }
}

/// Azure synthesizer，单个会话使用
pub struct AzureSynthesizer {
    client: Client,
    host: String,
    key: String,
    voice: String,
    output_format: String,
    user_agent: String,
    playback: Option<Arc<dyn AudioPlaybackPort>>,
    /// dispose 后为 None
    output: Mutex<Option<AudioOutput>>,
    cancel: CancellationToken,
}

enum OutputKind {
    Device,
    Stream,
    Released,
}

enum ChunkWrite {
    Accepted(usize),
    Released,
}

impl AzureSynthesizer {
    fn synthesis_url(&self) -> String {
        format!("{}/cognitiveservices/v1", self.host)
    }

    fn voices_url(&self) -> String {
        format!("{}/cognitiveservices/voices/list", self.host)
    }

    fn output_kind(&self) -> OutputKind {
        match self
            .output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(AudioOutput::Device) => OutputKind::Device,
            Some(_) => OutputKind::Stream,
            None => OutputKind::Released,
        }
    }

    fn write_chunk(&self, chunk: &[u8]) -> ChunkWrite {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        match output.as_mut() {
            Some(AudioOutput::Sink(sink)) => ChunkWrite::Accepted(sink.write(chunk)),
            Some(_) => ChunkWrite::Accepted(chunk.len()),
            None => ChunkWrite::Released,
        }
    }

    /// 把响应体逐块推送到输出端
    async fn stream_to_sink(&self, response: Response) -> Result<SynthesisResult, SpeechError> {
        let mut stream = response.bytes_stream();
        let mut total = 0u64;

        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => return Ok(SynthesisResult::canceled(total)),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(map_request_error)?;

            match self.write_chunk(&chunk) {
                ChunkWrite::Accepted(n) => {
                    total += n as u64;
                    if n < chunk.len() {
                        return Err(SpeechError::Resource(format!(
                            "audio sink accepted {} of {} bytes",
                            n,
                            chunk.len()
                        )));
                    }
                }
                ChunkWrite::Released => return Ok(SynthesisResult::canceled(total)),
            }
        }

        Ok(SynthesisResult::completed(total))
    }

    /// 收齐音频后交给本地设备播放
    async fn play_on_device(&self, response: Response) -> Result<SynthesisResult, SpeechError> {
        let playback = self
            .playback
            .clone()
            .ok_or_else(|| SpeechError::Resource("no audio output device available".into()))?;

        let mut stream = response.bytes_stream();
        let mut audio = Vec::new();
        loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => return Ok(SynthesisResult::canceled(0)),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            audio.extend_from_slice(&chunk.map_err(map_request_error)?);
        }

        let audio_bytes = audio.len() as u64;
        playback
            .play(audio, self.cancel.clone())
            .await
            .map_err(|e| SpeechError::Resource(e.to_string()))?;

        if self.cancel.is_cancelled() {
            Ok(SynthesisResult::canceled(audio_bytes))
        } else {
            Ok(SynthesisResult::completed(audio_bytes))
        }
    }
}

#[async_trait]
impl SynthesizerPort for AzureSynthesizer {
    async fn speak(&self, text: &str) -> Result<SynthesisResult, SpeechError> {
        if self.cancel.is_cancelled() {
            return Ok(SynthesisResult::canceled(0));
        }

        let ssml = build_ssml(&self.voice, text);
        tracing::debug!(
            url = %self.synthesis_url(),
            voice = %self.voice,
            text_len = text.len(),
            "Sending synthesis request"
        );

        let request = self
            .client
            .post(self.synthesis_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .header(OUTPUT_FORMAT_HEADER, &self.output_format)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header(USER_AGENT, &self.user_agent)
            .body(ssml)
            .send();

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(SynthesisResult::canceled(0)),
            response = request => response.map_err(map_request_error)?,
        };
        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(SynthesisResult::canceled(0)),
            response = check_status(response) => response?,
        };

        let result = match self.output_kind() {
            OutputKind::Device => self.play_on_device(response).await?,
            OutputKind::Stream => self.stream_to_sink(response).await?,
            OutputKind::Released => SynthesisResult::canceled(0),
        };

        tracing::info!(
            voice = %self.voice,
            reason = ?result.reason,
            audio_size = result.audio_bytes,
            "Synthesis finished"
        );
        Ok(result)
    }

    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError> {
        tracing::debug!(url = %self.voices_url(), "Fetching voice list");

        let fetch = async {
            let response = self
                .client
                .get(self.voices_url())
                .header(SUBSCRIPTION_KEY_HEADER, &self.key)
                .header(USER_AGENT, &self.user_agent)
                .send()
                .await
                .map_err(map_request_error)?;
            let response = check_status(response).await?;

            response.json::<Vec<AzureVoice>>().await.map_err(|e| {
                SpeechError::InvalidResponse(format!("Failed to parse voices: {}", e))
            })
        };

        let voices = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Voice list request canceled");
                return Err(SpeechError::Canceled);
            }
            voices = fetch => voices?,
        };

        tracing::info!(voice_count = voices.len(), "Voice list fetched");
        Ok(voices.into_iter().map(VoiceDescriptor::from).collect())
    }

    fn cancel(&self) {
        self.cancel.cancel();
    }

    fn dispose(&self) {
        self.cancel.cancel();
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

fn map_request_error(e: reqwest::Error) -> SpeechError {
    if e.is_timeout() {
        SpeechError::Timeout
    } else if e.is_connect() {
        SpeechError::Network(format!("Cannot connect to speech service: {}", e))
    } else {
        SpeechError::Network(e.to_string())
    }
}

async fn check_status(response: Response) -> Result<Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(status = %status, error = %e, "Failed to read error response body");
            format!("(unreadable response body: {})", e)
        }
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SpeechError::Authentication(
            format!("HTTP {}: {}", status, error_text),
        )),
        _ => Err(SpeechError::Service {
            status: status.as_u16(),
            message: error_text,
        }),
    }
}

/// 由音色名推出 xml:lang，例如 `en-US-JennyNeural` -> `en-US`
fn voice_lang(voice: &str) -> String {
    let mut parts = voice.splitn(3, '-');
    match (parts.next(), parts.next()) {
        (Some(lang), Some(region)) if !lang.is_empty() && !region.is_empty() => {
            format!("{}-{}", lang, region)
        }
        _ => FALLBACK_LANG.to_string(),
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn build_ssml(voice: &str, text: &str) -> String {
    format!(
        "<speak version='1.0' xml:lang='{}'><voice name='{}'>{}</voice></speak>",
        voice_lang(voice),
        escape_xml(voice),
        escape_xml(text)
    )
}
