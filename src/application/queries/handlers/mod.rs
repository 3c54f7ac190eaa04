//! Query Handlers 实现

mod catalog_handlers;
mod settings_handlers;

pub use catalog_handlers::*;
pub use settings_handlers::*;
