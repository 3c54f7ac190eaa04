//! Memory Layer - In-Memory State Management
//!
//! 实现 SessionManager 和 VoiceCatalog，管理合成会话与音色目录的内存状态

mod session_manager;
mod voice_catalog;

pub use session_manager::InMemorySessionManager;
pub use voice_catalog::InMemoryVoiceCatalog;
