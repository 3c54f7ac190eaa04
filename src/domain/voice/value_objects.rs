//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 音色描述
///
/// 由语音服务返回，获取后不可变。`name` 是服务端的短名称（如 `en-US-JennyNeural`），
/// 合成时直接作为音色名使用。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub name: String,
    pub locale: String,
    pub display_name: Option<String>,
    pub local_name: Option<String>,
    pub gender: Option<String>,
    pub voice_type: Option<String>,
    pub sample_rate_hertz: Option<u32>,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
            display_name: None,
            local_name: None,
            gender: None,
            voice_type: None,
            sample_rate_hertz: None,
        }
    }
}

/// 区域过滤器
///
/// `All` 表示不过滤，`Locale` 只保留 locale 完全相等的音色
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocaleFilter {
    #[default]
    All,
    Locale(String),
}

impl LocaleFilter {
    pub fn locale(tag: impl Into<String>) -> Self {
        Self::Locale(tag.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// 判断音色是否通过过滤
    pub fn matches(&self, voice: &VoiceDescriptor) -> bool {
        match self {
            Self::All => true,
            Self::Locale(tag) => voice.locale == *tag,
        }
    }
}

impl fmt::Display for LocaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Locale(tag) => write!(f, "{}", tag),
        }
    }
}

impl FromStr for LocaleFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Locale(s.to_string()))
        }
    }
}
