//! In-Memory Session Manager Implementation
//!
//! 单一“当前会话”槽位，读-判断-替换在同一把锁内完成，
//! 因此不会出现两个可写同一目标的 synthesizer 同时存活。
//! 被替换的会话可能晚于新会话结束，文件占用表记录每个路径最后由谁打开。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::ports::{
    ActiveSession, SessionError, SessionManagerPort, SynthesizerBuilder, SynthesizerPort,
};
use crate::domain::synthesis::{Session, SessionOutcome, SessionState, SynthesisTarget};
use crate::infrastructure::events::EventPublisher;

/// 当前会话槽位
struct Slot {
    session: Session,
    synthesizer: Arc<dyn SynthesizerPort>,
    state: SessionState,
}

/// 文件目标的占用情况
struct FileClaim {
    /// 最后一个打开该路径的会话
    owner: String,
    /// 尚未释放占用的会话数
    holders: usize,
}

/// 内存会话管理器
pub struct InMemorySessionManager {
    current: Mutex<Option<Slot>>,
    file_claims: Mutex<HashMap<PathBuf, FileClaim>>,
    last_outcome: Mutex<Option<(String, SessionOutcome)>>,
    events: Arc<EventPublisher>,
}

impl InMemorySessionManager {
    pub fn new(events: Arc<EventPublisher>) -> Self {
        Self {
            current: Mutex::new(None),
            file_claims: Mutex::new(HashMap::new()),
            last_outcome: Mutex::new(None),
            events,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<Slot>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_claims(&self) -> MutexGuard<'_, HashMap<PathBuf, FileClaim>> {
        self.file_claims.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim_target(&self, session: &Session) {
        if let SynthesisTarget::File(path) = &session.target {
            let mut claims = self.lock_claims();
            let claim = claims.entry(path.clone()).or_insert(FileClaim {
                owner: session.id.clone(),
                holders: 0,
            });
            claim.owner = session.id.clone();
            claim.holders += 1;
        }
    }

    fn record_outcome(&self, session_id: &str, outcome: SessionOutcome) {
        self.events.publish_finished(session_id, &outcome);
        self.events.publish_state_changed(session_id, SessionState::Idle);
        *self
            .last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((session_id.to_string(), outcome));
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new(Arc::new(EventPublisher::new()))
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn start(
        &self,
        session: Session,
        build: SynthesizerBuilder<'_>,
    ) -> Result<ActiveSession, SessionError> {
        let mut current = self.lock_current();

        // 新请求总是替换旧会话，无论旧会话是否已进入终态
        if let Some(previous) = current.take() {
            previous.synthesizer.dispose();
            tracing::warn!(
                session_id = %previous.session.id,
                state = previous.state.as_str(),
                "Superseded session disposed"
            );
            self.record_outcome(&previous.session.id, SessionOutcome::Canceled);
        }

        self.events
            .publish_state_changed(&session.id, SessionState::Starting);

        match build() {
            Ok(synthesizer) => {
                tracing::info!(
                    session_id = %session.id,
                    target = %session.target,
                    voice = ?session.voice_name,
                    "Session started"
                );
                self.claim_target(&session);
                *current = Some(Slot {
                    session: session.clone(),
                    synthesizer: synthesizer.clone(),
                    state: SessionState::Starting,
                });
                Ok(ActiveSession {
                    session,
                    synthesizer,
                })
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "Session failed to start");
                self.record_outcome(&session.id, SessionOutcome::Failed(e.to_string()));
                Err(SessionError::Build(e))
            }
        }
    }

    fn mark_speaking(&self, id: &str) -> bool {
        let mut current = self.lock_current();
        match current.as_mut() {
            Some(slot) if slot.session.id == id => {
                slot.state = SessionState::Speaking;
                self.events.publish_state_changed(id, SessionState::Speaking);
                true
            }
            _ => false,
        }
    }

    fn finish(&self, id: &str, outcome: SessionOutcome) -> bool {
        let mut current = self.lock_current();
        let is_current = matches!(current.as_ref(), Some(slot) if slot.session.id == id);
        if !is_current {
            tracing::debug!(session_id = %id, "Finish ignored for superseded session");
            return false;
        }

        if let Some(slot) = current.take() {
            slot.synthesizer.dispose();
            tracing::info!(
                session_id = %id,
                outcome = outcome.as_str(),
                "Session finished"
            );
            self.record_outcome(id, outcome);
        }
        true
    }

    fn release_target(&self, id: &str, path: &Path) -> bool {
        let mut claims = self.lock_claims();
        let Some(claim) = claims.get_mut(path) else {
            return true;
        };

        let owned = claim.owner == id;
        claim.holders = claim.holders.saturating_sub(1);
        if claim.holders == 0 {
            claims.remove(path);
        }
        if !owned {
            tracing::debug!(session_id = %id, path = ?path, "Target reopened by a later session");
        }
        owned
    }

    fn stop(&self) -> bool {
        let current = self.lock_current();
        match current.as_ref() {
            Some(slot) => {
                slot.synthesizer.cancel();
                tracing::info!(session_id = %slot.session.id, "Cancellation requested");
                true
            }
            None => false,
        }
    }

    fn state(&self) -> SessionState {
        self.lock_current()
            .as_ref()
            .map(|slot| slot.state)
            .unwrap_or(SessionState::Idle)
    }

    fn current(&self) -> Option<Session> {
        self.lock_current().as_ref().map(|slot| slot.session.clone())
    }

    fn last_outcome(&self) -> Option<(String, SessionOutcome)> {
        self.last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
