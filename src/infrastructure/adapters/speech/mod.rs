//! Speech Adapter - 语音服务客户端实现

mod azure_speech_client;
mod fake_speech_client;

pub use azure_speech_client::{AzureSpeechClient, AzureSpeechClientConfig};
pub use fake_speech_client::{silent_wav, FakeEvent, FakeSpeechClient, FakeSpeechClientConfig};
