//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 音色描述（服务端返回，不可变）
//! - 区域过滤
//! - 音色目录与区域派生

mod catalog;
mod value_objects;

pub use catalog::VoiceCatalog;
pub use value_objects::{LocaleFilter, VoiceDescriptor};
