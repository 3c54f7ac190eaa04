//! Synthesis Context - 合成会话限界上下文
//!
//! 职责:
//! - 凭据与合成请求
//! - 会话状态与终态
//! - 输出文件名生成

mod file_name;
mod value_objects;

pub use file_name::{derive_file_name, AUDIO_FILE_EXTENSION};
pub use value_objects::{
    Credentials, Session, SessionOutcome, SessionState, SynthesisRequest, SynthesisTarget,
};
