//! Event Publisher Implementation
//!
//! 会话与音色目录的变更通知（广播），供界面层订阅刷新

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::synthesis::{SessionOutcome, SessionState};
use crate::domain::voice::LocaleFilter;

/// 变更事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SessionEvent {
    /// 会话状态变更
    StateChanged {
        session_id: String,
        state: SessionState,
    },
    /// 会话结束
    Finished {
        session_id: String,
        outcome: SessionOutcome,
    },
    /// 音色目录已刷新
    CatalogRefreshed {
        voice_count: usize,
        locale_count: usize,
    },
    /// 区域过滤器变更
    FilterChanged { filter: LocaleFilter },
    /// 选中音色变更
    VoiceSelected {
        #[serde(skip_serializing_if = "Option::is_none")]
        voice_name: Option<String>,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<SessionEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅所有事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.channel.subscribe()
    }

    /// 发布会话状态变更事件
    pub fn publish_state_changed(&self, session_id: &str, state: SessionState) {
        self.publish(SessionEvent::StateChanged {
            session_id: session_id.to_string(),
            state,
        });
    }

    /// 发布会话结束事件
    pub fn publish_finished(&self, session_id: &str, outcome: &SessionOutcome) {
        self.publish(SessionEvent::Finished {
            session_id: session_id.to_string(),
            outcome: outcome.clone(),
        });
    }

    /// 发布目录刷新事件
    pub fn publish_catalog_refreshed(&self, voice_count: usize, locale_count: usize) {
        self.publish(SessionEvent::CatalogRefreshed {
            voice_count,
            locale_count,
        });
    }

    pub fn publish_filter_changed(&self, filter: &LocaleFilter) {
        self.publish(SessionEvent::FilterChanged {
            filter: filter.clone(),
        });
    }

    pub fn publish_voice_selected(&self, voice_name: Option<&str>) {
        self.publish(SessionEvent::VoiceSelected {
            voice_name: voice_name.map(str::to_string),
        });
    }

    fn publish(&self, event: SessionEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Event dropped (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
