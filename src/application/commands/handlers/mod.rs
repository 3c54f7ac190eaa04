//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod catalog_handlers;
mod settings_handlers;
mod synthesis_handlers;

pub use catalog_handlers::*;
pub use settings_handlers::*;
pub use synthesis_handlers::*;
