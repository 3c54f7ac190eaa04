//! 领域层
//!
//! - synthesis: 合成会话相关的值对象与文件名派生
//! - voice: 音色与音色目录

pub mod synthesis;
pub mod voice;
