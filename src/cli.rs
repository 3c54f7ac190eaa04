//! 命令行定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Azure 语音合成桌面工具
#[derive(Parser)]
#[command(name = "speechdesk")]
#[command(about = "Speak text or save it as audio using Azure text-to-speech")]
pub struct Cli {
    /// 配置文件路径
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 不访问网络，使用内置的离线语音客户端
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 查看或修改用户设置
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// 刷新音色目录并列出区域
    Locales,
    /// 刷新音色目录并列出音色
    Voices {
        /// 区域过滤器，例如 en-US 或 all
        #[arg(long)]
        locale: Option<String>,
    },
    /// 在默认设备上朗读文本（需要以 `playback` feature 构建，否则配合 --offline 使用）
    Play {
        #[arg(long)]
        text: String,
        #[arg(long)]
        voice: Option<String>,
    },
    /// 把文本合成为 WAV 文件
    Download {
        #[arg(long)]
        text: String,
        #[arg(long)]
        voice: Option<String>,
        /// 关闭自动命名时的目标文件
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long, value_name = "BOOL")]
        auto_name: Option<bool>,
        #[arg(long, value_name = "BOOL")]
        auto_open: Option<bool>,
        #[arg(long, value_name = "DIR")]
        save_to: Option<String>,
    },
}
