//! Catalog Command Handlers

use std::sync::Arc;

use crate::application::commands::catalog_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioOutput, CatalogSnapshot, SpeechClientFactoryPort, SynthesizerPort, VoiceCatalogPort,
};
use crate::domain::voice::VoiceDescriptor;

/// 离开作用域时释放 synthesizer
struct DisposeOnDrop(Arc<dyn SynthesizerPort>);

impl Drop for DisposeOnDrop {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

/// RefreshCatalog Handler - 从服务端重新获取音色列表
///
/// 使用一个不输出音频的临时 synthesizer，任何路径下都会释放。失败时保留原目录。
pub struct RefreshCatalogHandler {
    speech_client: Arc<dyn SpeechClientFactoryPort>,
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl RefreshCatalogHandler {
    pub fn new(
        speech_client: Arc<dyn SpeechClientFactoryPort>,
        catalog: Arc<dyn VoiceCatalogPort>,
    ) -> Self {
        Self {
            speech_client,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: RefreshCatalogCommand,
    ) -> Result<CatalogSnapshot, ApplicationError> {
        cmd.credentials
            .validate()
            .map_err(ApplicationError::configuration)?;

        let config = self.speech_client.create_config(&cmd.credentials)?;
        let synthesizer = DisposeOnDrop(
            self.speech_client
                .create_synthesizer(&config, AudioOutput::Null)?,
        );

        let voices = synthesizer.0.list_voices().await;
        drop(synthesizer);

        let voices = voices.map_err(|e| {
            tracing::warn!(error = %e, "Voice list refresh failed");
            ApplicationError::from(e)
        })?;

        Ok(self.catalog.replace(voices))
    }
}

/// SelectLocale Handler - 切换区域过滤器，返回过滤后的音色
pub struct SelectLocaleHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl SelectLocaleHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(
        &self,
        cmd: SelectLocaleCommand,
    ) -> Result<Vec<VoiceDescriptor>, ApplicationError> {
        self.catalog.set_filter(cmd.filter)?;
        Ok(self.catalog.filtered_voices(None))
    }
}

/// SelectVoice Handler
pub struct SelectVoiceHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl SelectVoiceHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, cmd: SelectVoiceCommand) -> Result<VoiceDescriptor, ApplicationError> {
        Ok(self.catalog.select_voice(&cmd.voice_name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::Credentials;
    use crate::domain::voice::LocaleFilter;
    use crate::infrastructure::adapters::{FakeEvent, FakeSpeechClient, FakeSpeechClientConfig};
    use crate::infrastructure::memory::InMemoryVoiceCatalog;

    fn refresh_cmd() -> RefreshCatalogCommand {
        RefreshCatalogCommand {
            credentials: Credentials::new("key", "westus"),
        }
    }

    fn abc() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("A", "en-US"),
            VoiceDescriptor::new("B", "en-US"),
            VoiceDescriptor::new("C", "fr-FR"),
        ]
    }

    #[tokio::test]
    async fn test_refresh_builds_catalog() {
        let client = Arc::new(FakeSpeechClient::new(FakeSpeechClientConfig {
            voices: abc(),
            ..Default::default()
        }));
        let catalog = InMemoryVoiceCatalog::default().arc();
        let handler = RefreshCatalogHandler::new(client.clone(), catalog.clone());

        let snapshot = handler.handle(refresh_cmd()).await.unwrap();

        assert_eq!(
            snapshot.locales,
            vec![
                LocaleFilter::All,
                LocaleFilter::locale("en-US"),
                LocaleFilter::locale("fr-FR"),
            ]
        );
        assert_eq!(snapshot.active_filter, LocaleFilter::All);
        assert_eq!(snapshot.selected_voice.as_deref(), Some("A"));
        assert_eq!(catalog.voice_count(), 3);
        assert_eq!(
            client.events(),
            vec![FakeEvent::Created(1), FakeEvent::Disposed(1)]
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_catalog() {
        let client = Arc::new(FakeSpeechClient::new(FakeSpeechClientConfig {
            list_error: Some("unavailable".to_string()),
            ..Default::default()
        }));
        let catalog = InMemoryVoiceCatalog::default().arc();
        catalog.replace(abc());
        catalog.select_voice("C").unwrap();

        let handler = RefreshCatalogHandler::new(client.clone(), catalog.clone());
        let err = handler.handle(refresh_cmd()).await.unwrap_err();

        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
        assert_eq!(catalog.voice_count(), 3);
        assert_eq!(catalog.selected_voice().unwrap().name, "C");
        assert_eq!(client.disposed_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_requires_credentials() {
        let client = Arc::new(FakeSpeechClient::with_defaults());
        let handler =
            RefreshCatalogHandler::new(client.clone(), InMemoryVoiceCatalog::default().arc());

        let err = handler
            .handle(RefreshCatalogCommand {
                credentials: Credentials::new("key", ""),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ConfigurationError(_)));
        assert_eq!(client.created_count(), 0);
    }

    #[test]
    fn test_select_locale_and_voice() {
        let catalog = InMemoryVoiceCatalog::default().arc();
        catalog.replace(abc());

        let voices = SelectLocaleHandler::new(catalog.clone())
            .handle(SelectLocaleCommand {
                filter: LocaleFilter::locale("fr-FR"),
            })
            .unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].name, "C");

        let err = SelectLocaleHandler::new(catalog.clone())
            .handle(SelectLocaleCommand {
                filter: LocaleFilter::locale("de-DE"),
            })
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let voice = SelectVoiceHandler::new(catalog.clone())
            .handle(SelectVoiceCommand {
                voice_name: "B".to_string(),
            })
            .unwrap();
        assert_eq!(voice.locale, "en-US");
        assert!(SelectVoiceHandler::new(catalog)
            .handle(SelectVoiceCommand {
                voice_name: "Z".to_string(),
            })
            .is_err());
    }
}
