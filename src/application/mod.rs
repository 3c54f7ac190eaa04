//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechClient、AudioSink、SessionManager、VoiceCatalog、SettingsStore 等）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        resolve_destination, DownloadHandler, PlayHandler, RefreshCatalogHandler,
        SelectLocaleHandler, SelectVoiceHandler, StopHandler, UpdateSettingsHandler,
    },
    DownloadCommand, DownloadResponse, PlayCommand, PlayResponse, RefreshCatalogCommand,
    SelectLocaleCommand, SelectVoiceCommand, StopCommand, StopResponse, UpdateSettingsCommand,
};

pub use error::ApplicationError;

pub use ports::{
    // Speech client
    AudioOutput,
    SpeechClientFactoryPort,
    SpeechConfig,
    SpeechError,
    SynthesisReason,
    SynthesisResult,
    SynthesizerPort,
    // Audio sink / playback
    AudioPlaybackPort,
    AudioSinkPort,
    PlaybackError,
    // Session manager
    ActiveSession,
    SessionError,
    SessionManagerPort,
    SynthesizerBuilder,
    // Voice catalog
    CatalogError,
    CatalogSnapshot,
    VoiceCatalogPort,
    // Settings
    SettingsError,
    SettingsStorePort,
    UserSettings,
};

pub use queries::{
    handlers::{
        GetSelectionHandler, GetSettingsHandler, ListLocalesHandler, ListVoicesHandler,
        SelectionResponse,
    },
    GetSelection, GetSettings, ListLocales, ListVoices,
};
