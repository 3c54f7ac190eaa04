//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_playback;
mod audio_sink;
mod session_manager;
mod settings_store;
mod speech_client;
mod voice_catalog;

pub use audio_playback::{AudioPlaybackPort, PlaybackError};
pub use audio_sink::AudioSinkPort;
pub use session_manager::{ActiveSession, SessionError, SessionManagerPort, SynthesizerBuilder};
pub use settings_store::{SettingsError, SettingsStorePort, UserSettings};
pub use speech_client::{
    AudioOutput, SpeechClientFactoryPort, SpeechConfig, SpeechError, SynthesisReason,
    SynthesisResult, SynthesizerPort,
};
pub use voice_catalog::{CatalogError, CatalogSnapshot, VoiceCatalogPort};
