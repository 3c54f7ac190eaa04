//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod playback;
pub mod sink;
pub mod speech;

pub use playback::*;
pub use sink::*;
pub use speech::*;
