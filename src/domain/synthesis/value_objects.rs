//! Synthesis Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// 语音服务凭据
///
/// 不变量: key 与 region 均非空才能创建会话
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub region: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            region: region.into(),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.key.trim().is_empty() {
            return Err("Speech key cannot be empty");
        }
        if self.region.trim().is_empty() {
            return Err("Speech region cannot be empty");
        }
        Ok(())
    }
}

// key 不进日志
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"***")
            .field("region", &self.region)
            .finish()
    }
}

/// 合成输出目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthesisTarget {
    /// 默认播放设备
    Device,
    /// 写入本地文件
    File(PathBuf),
}

impl fmt::Display for SynthesisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// 合成请求，每次用户操作新建，创建后不再修改
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_name: Option<String>,
    pub target: SynthesisTarget,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        voice_name: Option<String>,
        target: SynthesisTarget,
    ) -> Self {
        Self {
            text: text.into(),
            voice_name,
            target,
        }
    }
}

/// 会话状态（非终态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Starting,
    Speaking,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Speaking => "speaking",
        }
    }
}

/// 会话终态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Completed,
    Canceled,
    Failed(String),
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// 合成会话
///
/// 一次完整的合成尝试，绑定一对 config/synthesizer。同一时刻最多一个为当前会话。
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub text: String,
    pub voice_name: Option<String>,
    pub target: SynthesisTarget,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(request: &SynthesisRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: request.text.clone(),
            voice_name: request.voice_name.clone(),
            target: request.target.clone(),
            created_at: Utc::now(),
        }
    }
}
