//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（speechdesk.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["speechdesk", "speechdesk.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SPEECHDESK_`，层级分隔符 `__`）
/// 2. 配置文件（speechdesk.toml 或 speechdesk.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SPEECHDESK_SPEECH__ENDPOINT=http://localhost:9000`
/// - `SPEECHDESK_SPEECH__TIMEOUT_SECS=30`
/// - `SPEECHDESK_SETTINGS__PATH=/data/AppConfig.json`
/// - `SPEECHDESK_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("speech.timeout_secs", 60)?
        .set_default("speech.output_format", "riff-24khz-16bit-mono-pcm")?
        .set_default("speech.default_voice", "en-US-JennyNeural")?
        .set_default("speech.user_agent", "speechdesk")?
        .set_default("settings.path", "AppConfig.json")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 例如: SPEECHDESK_SPEECH__ENDPOINT=http://localhost:9000
    builder = builder.add_source(
        Environment::with_prefix("SPEECHDESK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.speech.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Speech timeout cannot be 0".to_string(),
        ));
    }

    if config.speech.output_format.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Speech output format cannot be empty".to_string(),
        ));
    }

    if config.settings.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Settings path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    match &config.speech.endpoint {
        Some(endpoint) => tracing::info!("Speech Endpoint: {}", endpoint),
        None => tracing::info!("Speech Endpoint: <per region>"),
    }
    tracing::info!("Speech Timeout: {}s", config.speech.timeout_secs);
    tracing::info!("Output Format: {}", config.speech.output_format);
    tracing::info!("Default Voice: {}", config.speech.default_voice);
    tracing::info!("Settings File: {:?}", config.settings.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
