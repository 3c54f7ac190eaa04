//! Session Manager Port - 合成会话生命周期管理
//!
//! 定义会话管理的抽象接口，具体实现在 infrastructure/memory 层

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::synthesis::{Session, SessionOutcome, SessionState};

use super::{SpeechError, SynthesizerPort};

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 构建合成客户端失败
    #[error("Failed to start session: {0}")]
    Build(#[from] SpeechError),
}

/// 会话构建过程
///
/// 在旧会话释放之后、新会话登记之前执行，负责创建 config、获取输出目标、创建 synthesizer
pub type SynthesizerBuilder<'a> =
    Box<dyn FnOnce() -> Result<Arc<dyn SynthesizerPort>, SpeechError> + Send + 'a>;

/// 已启动的会话
#[derive(Clone)]
pub struct ActiveSession {
    pub session: Session,
    pub synthesizer: Arc<dyn SynthesizerPort>,
}

impl ActiveSession {
    pub fn id(&self) -> &str {
        &self.session.id
    }
}

/// Session Manager Port
///
/// 保证同一时刻最多一个会话在途：启动新会话时先释放旧会话（恰好一次），再创建新句柄
pub trait SessionManagerPort: Send + Sync {
    /// 释放当前会话并启动新会话
    fn start(
        &self,
        session: Session,
        build: SynthesizerBuilder<'_>,
    ) -> Result<ActiveSession, SessionError>;

    /// Starting -> Speaking；会话已被替换时返回 false
    fn mark_speaking(&self, id: &str) -> bool;

    /// 结束会话并释放资源；会话已被替换时不做任何事并返回 false
    fn finish(&self, id: &str, outcome: SessionOutcome) -> bool;

    /// 释放会话对其目标文件的占用
    ///
    /// 返回该会话是否仍是最后一个打开此路径的会话；为 false 时文件已归后来的会话所有
    fn release_target(&self, id: &str, path: &Path) -> bool;

    /// 请求取消当前会话，不等待取消生效；空闲时返回 false
    fn stop(&self) -> bool;

    /// 当前状态
    fn state(&self) -> SessionState;

    /// 当前会话
    fn current(&self) -> Option<Session>;

    /// 最近一次结束的会话及其终态
    fn last_outcome(&self) -> Option<(String, SessionOutcome)>;
}
