//! Events - 变更通知

mod publisher;

pub use publisher::{EventPublisher, SessionEvent};
