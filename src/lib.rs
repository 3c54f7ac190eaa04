//! speechdesk - Azure 语音合成桌面工具核心
//!
//! 架构设计: CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Synthesis: 凭据、合成请求、会话状态、文件名派生
//! - Voice: 音色描述、区域过滤器、音色目录
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechClient, AudioSink, AudioPlayback, SessionManager, VoiceCatalog, SettingsStore）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Azure 语音客户端、离线客户端、字节流接收端、rodio 播放
//! - Memory: SessionManager, VoiceCatalog 内存实现
//! - Persistence: JSON 用户设置
//! - Events: 状态变更通知

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
