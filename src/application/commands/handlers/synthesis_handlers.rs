//! Synthesis Command Handlers
//!
//! Play / Download 都走同一条路径：校验凭据 -> 通过会话管理器替换旧会话并构建客户端
//! -> speak -> finish。

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::commands::synthesis_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ActiveSession, AudioOutput, SessionManagerPort, SpeechClientFactoryPort, SpeechError,
    SynthesisReason, SynthesizerBuilder,
};
use crate::domain::synthesis::{
    derive_file_name, Credentials, Session, SessionOutcome, SynthesisRequest, SynthesisTarget,
};
use crate::infrastructure::adapters::StreamAudioSink;

/// 一次会话的执行结果
struct SessionRun {
    outcome: SessionOutcome,
    audio_bytes: u64,
}

/// 调用方的 future 被丢弃时把会话记为 Canceled
struct FinishOnDrop<'a> {
    manager: &'a dyn SessionManagerPort,
    session_id: &'a str,
    armed: bool,
}

impl Drop for FinishOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(session_id = %self.session_id, "Session future dropped");
            self.manager
                .finish(self.session_id, SessionOutcome::Canceled);
        }
    }
}

/// speak 并结束会话；无论成功与否会话都会被 finish
async fn run_session(
    manager: &dyn SessionManagerPort,
    active: &ActiveSession,
) -> Result<SessionRun, SpeechError> {
    let mut guard = FinishOnDrop {
        manager,
        session_id: active.id(),
        armed: true,
    };

    manager.mark_speaking(active.id());
    let result = active.synthesizer.speak(&active.session.text).await;
    guard.armed = false;

    let outcome = match &result {
        Ok(r) if r.reason == SynthesisReason::Completed => SessionOutcome::Completed,
        Ok(_) => SessionOutcome::Canceled,
        Err(e) => SessionOutcome::Failed(e.to_string()),
    };
    manager.finish(active.id(), outcome.clone());

    let result = result?;
    Ok(SessionRun {
        outcome,
        audio_bytes: result.audio_bytes,
    })
}

/// 下载会话对目标文件的占用，离开作用域时释放
struct TargetClaim<'a> {
    manager: &'a dyn SessionManagerPort,
    session_id: &'a str,
    path: &'a Path,
    released: bool,
}

impl TargetClaim<'_> {
    /// 释放占用，返回文件是否仍归本会话所有
    fn release(mut self) -> bool {
        self.released = true;
        self.manager.release_target(self.session_id, self.path)
    }
}

impl Drop for TargetClaim<'_> {
    fn drop(&mut self) {
        if !self.released {
            self.manager.release_target(self.session_id, self.path);
        }
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<(), ApplicationError> {
    credentials.validate().map_err(ApplicationError::configuration)
}

/// 计算下载目标
///
/// - 配置了保存目录但目录不存在 -> ValidationError
/// - 自动命名 -> 保存目录（未配置时为当前工作目录）下的派生文件名
/// - 否则使用调用方选择的目标；None 表示放弃
pub fn resolve_destination(
    text: &str,
    auto_generate_file_name: bool,
    save_to: Option<&Path>,
    chosen: Option<PathBuf>,
) -> Result<Option<PathBuf>, ApplicationError> {
    if let Some(dir) = save_to {
        if !dir.is_dir() {
            return Err(ApplicationError::validation(format!(
                "Save folder does not exist: {}",
                dir.display()
            )));
        }
    }

    if !auto_generate_file_name {
        return Ok(chosen);
    }

    let file_name = derive_file_name(text);
    Ok(Some(match save_to {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }))
}

/// Play Handler - 合成并在默认设备上播放
pub struct PlayHandler {
    speech_client: Arc<dyn SpeechClientFactoryPort>,
    session_manager: Arc<dyn SessionManagerPort>,
}

impl PlayHandler {
    pub fn new(
        speech_client: Arc<dyn SpeechClientFactoryPort>,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        Self {
            speech_client,
            session_manager,
        }
    }

    pub async fn handle(&self, cmd: PlayCommand) -> Result<PlayResponse, ApplicationError> {
        validate_credentials(&cmd.credentials)?;

        let request = SynthesisRequest::new(cmd.text, cmd.voice_name, SynthesisTarget::Device);
        let session = Session::new(&request);

        let client = self.speech_client.clone();
        let credentials = cmd.credentials;
        let voice_name = request.voice_name.clone();
        let build: SynthesizerBuilder<'_> = Box::new(move || {
            let mut config = client.create_config(&credentials)?;
            config.set_voice_name(voice_name);
            client.create_synthesizer(&config, AudioOutput::Device)
        });

        let active = self.session_manager.start(session, build)?;
        let run = run_session(self.session_manager.as_ref(), &active).await?;

        tracing::info!(
            session_id = %active.id(),
            outcome = run.outcome.as_str(),
            audio_size = run.audio_bytes,
            "Play finished"
        );

        Ok(PlayResponse {
            session_id: active.session.id,
            outcome: run.outcome,
            audio_bytes: run.audio_bytes,
        })
    }
}

/// Download Handler - 合成并写入文件
pub struct DownloadHandler {
    speech_client: Arc<dyn SpeechClientFactoryPort>,
    session_manager: Arc<dyn SessionManagerPort>,
}

impl DownloadHandler {
    pub fn new(
        speech_client: Arc<dyn SpeechClientFactoryPort>,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        Self {
            speech_client,
            session_manager,
        }
    }

    pub async fn handle(&self, cmd: DownloadCommand) -> Result<DownloadResponse, ApplicationError> {
        let Some(path) = resolve_destination(
            &cmd.text,
            cmd.auto_generate_file_name,
            cmd.save_to.as_deref(),
            cmd.destination,
        )?
        else {
            tracing::debug!("Download aborted: no destination chosen");
            return Ok(DownloadResponse::Aborted);
        };

        validate_credentials(&cmd.credentials)?;

        let request = SynthesisRequest::new(
            cmd.text,
            cmd.voice_name,
            SynthesisTarget::File(path.clone()),
        );
        let session = Session::new(&request);

        // 文件句柄归调用方所有，接收端只持有一个克隆
        let mut file_handle: Option<Arc<File>> = None;
        let handle_slot = &mut file_handle;
        let client = self.speech_client.clone();
        let credentials = cmd.credentials;
        let voice_name = request.voice_name.clone();
        let target = path.clone();
        let build: SynthesizerBuilder<'_> = Box::new(move || {
            let mut config = client.create_config(&credentials)?;
            config.set_voice_name(voice_name);

            // 旧会话已释放，这里打开目标不会与其并发写入
            let file = File::create(&target).map(Arc::new).map_err(|e| {
                SpeechError::Resource(format!("Cannot open {}: {}", target.display(), e))
            })?;
            *handle_slot = Some(file.clone());

            client.create_synthesizer(&config, AudioOutput::Sink(Box::new(StreamAudioSink::new(file))))
        });

        let active = match self.session_manager.start(session, build) {
            Ok(active) => active,
            Err(e) => {
                if file_handle.take().is_some() {
                    discard(&path);
                }
                return Err(e.into());
            }
        };
        let claim = TargetClaim {
            manager: self.session_manager.as_ref(),
            session_id: active.id(),
            path: &path,
            released: false,
        };

        let run = run_session(self.session_manager.as_ref(), &active).await;

        if let Some(file) = file_handle.take() {
            if let Err(e) = file.sync_all() {
                tracing::warn!(path = ?path, error = %e, "Failed to sync audio file");
            }
        }

        // 同一路径已被后来的会话重新打开时，文件归新会话处理
        let owns_target = claim.release();
        let completed = matches!(&run, Ok(r) if r.outcome.is_completed());
        if !completed && owns_target {
            discard(&path);
        }
        let run = run?;

        tracing::info!(
            session_id = %active.id(),
            path = ?path,
            outcome = run.outcome.as_str(),
            audio_size = run.audio_bytes,
            "Download finished"
        );

        Ok(DownloadResponse::Saved {
            session_id: active.session.id,
            path,
            outcome: run.outcome,
            audio_bytes: run.audio_bytes,
            open_folder: cmd.open_folder,
        })
    }
}

/// 删除未完成的文件
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = ?path, "Incomplete audio file removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to remove incomplete audio file"),
    }
}

/// Stop Handler - 请求取消当前会话，不等待
pub struct StopHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl StopHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub fn handle(&self, _cmd: StopCommand) -> StopResponse {
        let cancel_requested = self.session_manager.stop();
        tracing::info!(cancel_requested, "Stop requested");
        StopResponse { cancel_requested }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SessionManagerPort;
    use crate::domain::synthesis::SessionState;
    use crate::infrastructure::adapters::{FakeEvent, FakeSpeechClient, FakeSpeechClientConfig};
    use crate::application::ports::{SpeechConfig, SynthesisResult, SynthesizerPort};
    use crate::domain::voice::VoiceDescriptor;
    use crate::infrastructure::memory::InMemorySessionManager;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct Fixture {
        client: Arc<FakeSpeechClient>,
        manager: Arc<InMemorySessionManager>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_config(FakeSpeechClientConfig::default())
        }

        fn with_config(config: FakeSpeechClientConfig) -> Self {
            Self {
                client: Arc::new(FakeSpeechClient::new(config)),
                manager: InMemorySessionManager::default().arc(),
            }
        }

        fn play(&self) -> Arc<PlayHandler> {
            Arc::new(PlayHandler::new(self.client.clone(), self.manager.clone()))
        }

        fn download(&self) -> Arc<DownloadHandler> {
            Arc::new(DownloadHandler::new(self.client.clone(), self.manager.clone()))
        }

        fn stop(&self) -> StopHandler {
            StopHandler::new(self.manager.clone())
        }

        async fn wait_until_speaking(&self) {
            while self.manager.state() != SessionState::Speaking {
                tokio::task::yield_now().await;
            }
        }
    }

    fn creds() -> Credentials {
        Credentials::new("key", "westus")
    }

    fn play_cmd(text: &str) -> PlayCommand {
        PlayCommand {
            credentials: creds(),
            text: text.to_string(),
            voice_name: Some("en-US-JennyNeural".to_string()),
        }
    }

    fn download_cmd(text: &str, save_to: Option<PathBuf>, destination: Option<PathBuf>) -> DownloadCommand {
        DownloadCommand {
            credentials: creds(),
            text: text.to_string(),
            voice_name: None,
            auto_generate_file_name: destination.is_none(),
            save_to,
            destination,
            open_folder: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_completes() {
        let fx = Fixture::new();
        let response = fx.play().handle(play_cmd("hello")).await.unwrap();

        assert_eq!(response.outcome, SessionOutcome::Completed);
        assert!(response.audio_bytes > 0);
        assert_eq!(fx.manager.state(), SessionState::Idle);
        assert_eq!(fx.client.events(), vec![FakeEvent::Created(1), FakeEvent::Disposed(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_rejects_empty_credentials_before_any_client() {
        let fx = Fixture::new();
        let mut cmd = play_cmd("hello");
        cmd.credentials = Credentials::new("", "westus");

        let err = fx.play().handle(cmd).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ConfigurationError(_)));
        assert_eq!(fx.client.created_count(), 0);

        let mut cmd = play_cmd("hello");
        cmd.credentials = Credentials::new("key", "");
        assert!(matches!(
            fx.play().handle(cmd).await,
            Err(ApplicationError::ConfigurationError(_))
        ));
        assert_eq!(fx.client.created_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_play_supersedes_first() {
        let fx = Fixture::new();
        let first = {
            let handler = fx.play();
            tokio::spawn(async move { handler.handle(play_cmd("first")).await })
        };
        fx.wait_until_speaking().await;

        let second = fx.play().handle(play_cmd("second")).await.unwrap();
        let first = first.await.unwrap().unwrap();

        assert_eq!(first.outcome, SessionOutcome::Canceled);
        assert_eq!(second.outcome, SessionOutcome::Completed);
        assert_eq!(
            fx.client.events(),
            vec![
                FakeEvent::Created(1),
                FakeEvent::Disposed(1),
                FakeEvent::Created(2),
                FakeEvent::Disposed(2),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_current_play() {
        let fx = Fixture::with_config(FakeSpeechClientConfig {
            chunk_delay: Duration::from_millis(100),
            ..Default::default()
        });
        let playing = {
            let handler = fx.play();
            tokio::spawn(async move { handler.handle(play_cmd("long text")).await })
        };
        fx.wait_until_speaking().await;

        assert!(fx.stop().handle(StopCommand).cancel_requested);
        let response = playing.await.unwrap().unwrap();

        assert_eq!(response.outcome, SessionOutcome::Canceled);
        assert_eq!(fx.manager.state(), SessionState::Idle);
        assert_eq!(
            fx.client.events(),
            vec![
                FakeEvent::Created(1),
                FakeEvent::Canceled(1),
                FakeEvent::Disposed(1),
            ]
        );
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let fx = Fixture::new();
        assert!(!fx.stop().handle(StopCommand).cancel_requested);
        assert_eq!(fx.manager.state(), SessionState::Idle);
        assert!(fx.client.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_service_error_is_external() {
        let fx = Fixture::with_config(FakeSpeechClientConfig {
            speak_error: Some("quota exceeded".to_string()),
            ..Default::default()
        });
        let err = fx.play().handle(play_cmd("hello")).await.unwrap_err();

        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
        assert_eq!(fx.manager.state(), SessionState::Idle);
        assert!(matches!(
            fx.manager.last_outcome(),
            Some((_, SessionOutcome::Failed(_)))
        ));
        assert_eq!(fx.client.disposed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_play_future_finishes_session() {
        let fx = Fixture::new();
        let handler = fx.play();
        {
            let fut = handler.handle(play_cmd("hello"));
            tokio::pin!(fut);
            // 推进到第一次等待
            let _ = tokio::time::timeout(Duration::from_millis(1), &mut fut).await;
        }
        assert_eq!(fx.manager.state(), SessionState::Idle);
        assert_eq!(
            fx.manager.last_outcome().map(|(_, o)| o),
            Some(SessionOutcome::Canceled)
        );
        assert_eq!(fx.client.disposed_count(), 1);
    }

    #[test]
    fn test_resolve_destination_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = resolve_destination("Hello", true, Some(&missing), None).unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[test]
    fn test_resolve_destination_auto_name_without_folder() {
        let path = resolve_destination("Hello: World", true, None, None).unwrap();
        assert_eq!(path, Some(PathBuf::from("Hello  World.wav")));
    }

    #[test]
    fn test_resolve_destination_uses_choice_when_not_auto_naming() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = dir.path().join("mine.wav");
        assert_eq!(
            resolve_destination("ignored", false, Some(dir.path()), Some(chosen.clone())).unwrap(),
            Some(chosen)
        );
        assert_eq!(resolve_destination("ignored", false, None, None).unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_auto_named_into_folder() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();

        let response = fx
            .download()
            .handle(download_cmd("Hello: World", Some(dir.path().to_path_buf()), None))
            .await
            .unwrap();

        let DownloadResponse::Saved {
            path,
            outcome,
            audio_bytes,
            open_folder,
            ..
        } = response
        else {
            panic!("expected a saved download");
        };
        assert_eq!(path, dir.path().join("Hello  World.wav"));
        assert_eq!(outcome, SessionOutcome::Completed);
        assert!(open_folder);

        let written = fs::read(&path).unwrap();
        assert_eq!(written.len() as u64, audio_bytes);
        assert_eq!(&written[0..4], b"RIFF");
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_missing_folder_creates_nothing() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = fx
            .download()
            .handle(download_cmd("Hello", Some(missing.clone()), None))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(fx.client.created_count(), 0);
        assert!(!missing.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_without_destination_is_aborted() {
        let fx = Fixture::new();
        let response = fx
            .download()
            .handle(download_cmd("Hello", None, None).with_auto_name(false))
            .await
            .unwrap();

        assert!(matches!(response, DownloadResponse::Aborted));
        assert_eq!(fx.client.created_count(), 0);
        assert_eq!(fx.manager.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_into_unwritable_target_is_resource_error() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        // 目标是已存在的目录，无法作为文件打开
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();

        let err = fx
            .download()
            .handle(download_cmd("Hello", None, Some(target)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ResourceError(_)));
        assert_eq!(fx.client.created_count(), 0);
        assert_eq!(fx.manager.state(), SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_download_removes_partial_file() {
        let fx = Fixture::with_config(FakeSpeechClientConfig {
            chunk_size: 64,
            chunk_delay: Duration::from_millis(100),
            ..Default::default()
        });
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("partial.wav");

        let downloading = {
            let handler = fx.download();
            let cmd = download_cmd("Hello", None, Some(target.clone()));
            tokio::spawn(async move { handler.handle(cmd).await })
        };
        fx.wait_until_speaking().await;
        assert!(target.exists());

        fx.stop().handle(StopCommand);
        let response = downloading.await.unwrap().unwrap();

        assert!(matches!(
            response,
            DownloadResponse::Saved {
                outcome: SessionOutcome::Canceled,
                ..
            }
        ));
        assert!(!target.exists());
    }

    /// 切换当前工作目录，离开作用域时恢复
    struct CurrentDirGuard(PathBuf);

    impl CurrentDirGuard {
        fn enter(dir: &Path) -> Self {
            let previous = std::env::current_dir().unwrap();
            std::env::set_current_dir(dir).unwrap();
            Self(previous)
        }
    }

    impl Drop for CurrentDirGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_auto_named_into_working_directory() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let _cwd = CurrentDirGuard::enter(dir.path());

        let response = fx
            .download()
            .handle(download_cmd("Hello: World", None, None))
            .await
            .unwrap();

        let DownloadResponse::Saved {
            path,
            outcome,
            audio_bytes,
            ..
        } = response
        else {
            panic!("expected a saved download");
        };
        assert_eq!(path, PathBuf::from("Hello  World.wav"));
        assert_eq!(outcome, SessionOutcome::Completed);

        let written = fs::read(dir.path().join("Hello  World.wav")).unwrap();
        assert_eq!(written.len() as u64, audio_bytes);
        assert_eq!(&written[0..4], b"RIFF");
    }

    /// 被取消后过一段时间才返回的 synthesizer
    struct SlowTeardown {
        inner: Arc<dyn SynthesizerPort>,
        delay: Duration,
    }

    #[async_trait]
    impl SynthesizerPort for SlowTeardown {
        async fn speak(&self, text: &str) -> Result<SynthesisResult, SpeechError> {
            let result = self.inner.speak(text).await;
            if matches!(&result, Ok(r) if r.reason == SynthesisReason::Canceled) {
                tokio::time::sleep(self.delay).await;
            }
            result
        }

        async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, SpeechError> {
            self.inner.list_voices().await
        }

        fn cancel(&self) {
            self.inner.cancel();
        }

        fn dispose(&self) {
            self.inner.dispose();
        }
    }

    /// 只有第一个 synthesizer 收尾缓慢的客户端
    struct SlowFirstTeardown {
        inner: FakeSpeechClient,
        delay: Duration,
        wrapped: AtomicBool,
    }

    impl SpeechClientFactoryPort for SlowFirstTeardown {
        fn create_config(&self, credentials: &Credentials) -> Result<SpeechConfig, SpeechError> {
            self.inner.create_config(credentials)
        }

        fn create_synthesizer(
            &self,
            config: &SpeechConfig,
            output: AudioOutput,
        ) -> Result<Arc<dyn SynthesizerPort>, SpeechError> {
            let synth = self.inner.create_synthesizer(config, output)?;
            if self.wrapped.swap(true, Ordering::SeqCst) {
                return Ok(synth);
            }
            Ok(Arc::new(SlowTeardown {
                inner: synth,
                delay: self.delay,
            }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_download_keeps_newer_file_at_same_path() {
        let client = Arc::new(SlowFirstTeardown {
            inner: FakeSpeechClient::new(FakeSpeechClientConfig {
                chunk_size: 64,
                chunk_delay: Duration::from_millis(100),
                ..Default::default()
            }),
            delay: Duration::from_secs(60),
            wrapped: AtomicBool::new(false),
        });
        let fx = Fixture::new();
        let handler = Arc::new(DownloadHandler::new(client.clone(), fx.manager.clone()));
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("same.wav");

        let first = {
            let handler = handler.clone();
            let cmd = download_cmd("first", None, Some(target.clone()));
            tokio::spawn(async move { handler.handle(cmd).await })
        };
        fx.wait_until_speaking().await;

        let second = handler
            .handle(download_cmd("second", None, Some(target.clone())))
            .await
            .unwrap();
        let DownloadResponse::Saved {
            outcome,
            audio_bytes,
            ..
        } = second
        else {
            panic!("expected a saved download");
        };
        assert_eq!(outcome, SessionOutcome::Completed);
        assert_eq!(fx.manager.state(), SessionState::Idle);

        // 旧会话在新会话完成之后才结束
        let first = first.await.unwrap().unwrap();
        assert!(matches!(
            first,
            DownloadResponse::Saved {
                outcome: SessionOutcome::Canceled,
                ..
            }
        ));

        let written = fs::read(&target).unwrap();
        assert_eq!(written.len() as u64, audio_bytes);
        assert_eq!(&written[0..4], b"RIFF");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_download_removes_own_file_at_other_path() {
        let fx = Fixture::with_config(FakeSpeechClientConfig {
            chunk_size: 64,
            chunk_delay: Duration::from_millis(100),
            ..Default::default()
        });
        let dir = tempfile::tempdir().unwrap();
        let first_target = dir.path().join("first.wav");
        let second_target = dir.path().join("second.wav");

        let first = {
            let handler = fx.download();
            let cmd = download_cmd("first", None, Some(first_target.clone()));
            tokio::spawn(async move { handler.handle(cmd).await })
        };
        fx.wait_until_speaking().await;

        fx.download()
            .handle(download_cmd("second", None, Some(second_target.clone())))
            .await
            .unwrap();
        first.await.unwrap().unwrap();

        assert!(!first_target.exists());
        assert!(second_target.exists());
    }

    impl DownloadCommand {
        fn with_auto_name(mut self, auto: bool) -> Self {
            self.auto_generate_file_name = auto;
            self
        }
    }
}
