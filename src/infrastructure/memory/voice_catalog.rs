//! In-Memory Voice Catalog Implementation

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::ports::{CatalogError, CatalogSnapshot, VoiceCatalogPort};
use crate::domain::voice::{LocaleFilter, VoiceCatalog, VoiceDescriptor};
use crate::infrastructure::events::EventPublisher;

struct CatalogState {
    catalog: VoiceCatalog,
    active_filter: LocaleFilter,
    selected_voice: Option<String>,
}

/// 内存音色目录
pub struct InMemoryVoiceCatalog {
    state: RwLock<CatalogState>,
    events: Arc<EventPublisher>,
}

impl InMemoryVoiceCatalog {
    pub fn new(events: Arc<EventPublisher>) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                catalog: VoiceCatalog::empty(),
                active_filter: LocaleFilter::All,
                selected_voice: None,
            }),
            events,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryVoiceCatalog {
    fn default() -> Self {
        Self::new(Arc::new(EventPublisher::new()))
    }
}

impl VoiceCatalogPort for InMemoryVoiceCatalog {
    fn replace(&self, voices: Vec<VoiceDescriptor>) -> CatalogSnapshot {
        let catalog = VoiceCatalog::new(voices);
        let snapshot = CatalogSnapshot {
            voice_count: catalog.len(),
            locales: catalog.locales().to_vec(),
            active_filter: catalog.default_filter().clone(),
            selected_voice: catalog.default_voice().map(|v| v.name.clone()),
        };

        {
            let mut state = self.write();
            state.active_filter = snapshot.active_filter.clone();
            state.selected_voice = snapshot.selected_voice.clone();
            state.catalog = catalog;
        }

        tracing::info!(
            voice_count = snapshot.voice_count,
            locale_count = snapshot.locales.len() - 1,
            "Voice catalog replaced"
        );
        self.events
            .publish_catalog_refreshed(snapshot.voice_count, snapshot.locales.len());
        self.events.publish_filter_changed(&snapshot.active_filter);
        self.events
            .publish_voice_selected(snapshot.selected_voice.as_deref());

        snapshot
    }

    fn locales(&self) -> Vec<LocaleFilter> {
        self.read().catalog.locales().to_vec()
    }

    fn active_filter(&self) -> LocaleFilter {
        self.read().active_filter.clone()
    }

    fn set_filter(&self, filter: LocaleFilter) -> Result<(), CatalogError> {
        {
            let mut state = self.write();
            if !state.catalog.has_locale(&filter) {
                return Err(CatalogError::UnknownLocale(filter.to_string()));
            }
            state.active_filter = filter.clone();
        }
        tracing::debug!(filter = %filter, "Locale filter changed");
        self.events.publish_filter_changed(&filter);
        Ok(())
    }

    fn selected_voice(&self) -> Option<VoiceDescriptor> {
        let state = self.read();
        state
            .selected_voice
            .as_deref()
            .and_then(|name| state.catalog.find(name))
            .cloned()
    }

    fn select_voice(&self, name: &str) -> Result<VoiceDescriptor, CatalogError> {
        let voice = {
            let mut state = self.write();
            let voice = state
                .catalog
                .find(name)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownVoice(name.to_string()))?;
            state.selected_voice = Some(voice.name.clone());
            voice
        };
        tracing::debug!(voice = %voice.name, "Voice selected");
        self.events.publish_voice_selected(Some(&voice.name));
        Ok(voice)
    }

    fn filtered_voices(&self, filter: Option<&LocaleFilter>) -> Vec<VoiceDescriptor> {
        let state = self.read();
        let filter = filter.unwrap_or(&state.active_filter);
        state.catalog.filtered(filter).into_iter().cloned().collect()
    }

    fn voice_count(&self) -> usize {
        self.read().catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("A", "en-US"),
            VoiceDescriptor::new("B", "en-US"),
            VoiceDescriptor::new("C", "fr-FR"),
        ]
    }

    #[test]
    fn test_replace_resets_filter_and_selection() {
        let catalog = InMemoryVoiceCatalog::default();
        let snapshot = catalog.replace(voices());

        assert_eq!(snapshot.voice_count, 3);
        assert_eq!(
            snapshot.locales,
            vec![
                LocaleFilter::All,
                LocaleFilter::locale("en-US"),
                LocaleFilter::locale("fr-FR"),
            ]
        );
        assert_eq!(catalog.active_filter(), LocaleFilter::All);
        assert_eq!(catalog.selected_voice().unwrap().name, "A");
    }

    #[test]
    fn test_replace_discards_previous_state() {
        let catalog = InMemoryVoiceCatalog::default();
        catalog.replace(voices());
        catalog.set_filter(LocaleFilter::locale("fr-FR")).unwrap();
        catalog.select_voice("C").unwrap();

        catalog.replace(vec![VoiceDescriptor::new("D", "de-DE")]);
        assert_eq!(catalog.voice_count(), 1);
        assert_eq!(catalog.active_filter(), LocaleFilter::All);
        assert_eq!(catalog.selected_voice().unwrap().name, "D");
        assert!(catalog.locales().iter().all(|l| l.to_string() != "fr-FR"));
    }

    #[test]
    fn test_filtered_view_follows_active_filter() {
        let catalog = InMemoryVoiceCatalog::default();
        catalog.replace(voices());
        assert_eq!(catalog.filtered_voices(None).len(), 3);

        catalog.set_filter(LocaleFilter::locale("en-US")).unwrap();
        let names: Vec<String> = catalog
            .filtered_voices(None)
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);

        // 显式过滤器不改变当前过滤器
        assert_eq!(
            catalog
                .filtered_voices(Some(&LocaleFilter::locale("fr-FR")))
                .len(),
            1
        );
        assert_eq!(catalog.active_filter(), LocaleFilter::locale("en-US"));
    }

    #[test]
    fn test_unknown_locale_and_voice_rejected() {
        let catalog = InMemoryVoiceCatalog::default();
        catalog.replace(voices());
        assert!(matches!(
            catalog.set_filter(LocaleFilter::locale("ja-JP")),
            Err(CatalogError::UnknownLocale(_))
        ));
        assert!(matches!(
            catalog.select_voice("Z"),
            Err(CatalogError::UnknownVoice(_))
        ));
        assert_eq!(catalog.active_filter(), LocaleFilter::All);
        assert_eq!(catalog.selected_voice().unwrap().name, "A");
    }

    #[test]
    fn test_empty_catalog_has_no_selection() {
        let catalog = InMemoryVoiceCatalog::default();
        assert!(catalog.selected_voice().is_none());
        assert_eq!(catalog.locales(), vec![LocaleFilter::All]);
        assert!(catalog.filtered_voices(None).is_empty());
    }
}
