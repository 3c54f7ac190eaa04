//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 语音服务配置
    #[serde(default)]
    pub speech: SpeechServiceConfig,

    /// 用户设置文件配置
    #[serde(default)]
    pub settings: SettingsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 语音服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechServiceConfig {
    /// 覆盖按 region 拼接的服务地址
    #[serde(default)]
    pub endpoint: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,

    /// X-Microsoft-OutputFormat
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// 未选择音色时使用
    #[serde(default = "default_voice")]
    pub default_voice: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_speech_timeout() -> u64 {
    60
}

fn default_output_format() -> String {
    "riff-24khz-16bit-mono-pcm".to_string()
}

fn default_voice() -> String {
    "en-US-JennyNeural".to_string()
}

fn default_user_agent() -> String {
    "speechdesk".to_string()
}

impl Default for SpeechServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_speech_timeout(),
            output_format: default_output_format(),
            default_voice: default_voice(),
            user_agent: default_user_agent(),
        }
    }
}

/// 用户设置文件配置
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// JSON 设置文件路径
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("AppConfig.json")
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
