//! Catalog Query Handlers

use std::sync::Arc;

use crate::application::ports::VoiceCatalogPort;
use crate::application::queries::{GetSelection, ListLocales, ListVoices};
use crate::domain::voice::{LocaleFilter, VoiceDescriptor};

// ============================================================================
// Response DTOs
// ============================================================================

/// 当前选择
#[derive(Debug, Clone)]
pub struct SelectionResponse {
    pub active_filter: LocaleFilter,
    pub selected_voice: Option<VoiceDescriptor>,
}

// ============================================================================
// Handlers
// ============================================================================

/// ListLocales Handler
pub struct ListLocalesHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl ListLocalesHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: ListLocales) -> Vec<LocaleFilter> {
        self.catalog.locales()
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, query: ListVoices) -> Vec<VoiceDescriptor> {
        self.catalog.filtered_voices(query.filter.as_ref())
    }
}

/// GetSelection Handler
pub struct GetSelectionHandler {
    catalog: Arc<dyn VoiceCatalogPort>,
}

impl GetSelectionHandler {
    pub fn new(catalog: Arc<dyn VoiceCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: GetSelection) -> SelectionResponse {
        SelectionResponse {
            active_filter: self.catalog.active_filter(),
            selected_voice: self.catalog.selected_voice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryVoiceCatalog;

    #[test]
    fn test_queries_over_catalog() {
        let catalog = InMemoryVoiceCatalog::default().arc();
        catalog.replace(vec![
            VoiceDescriptor::new("A", "en-US"),
            VoiceDescriptor::new("B", "en-US"),
            VoiceDescriptor::new("C", "fr-FR"),
        ]);

        assert_eq!(ListLocalesHandler::new(catalog.clone()).handle(ListLocales).len(), 3);

        let voices = ListVoicesHandler::new(catalog.clone());
        assert_eq!(voices.handle(ListVoices::default()).len(), 3);
        let en: Vec<String> = voices
            .handle(ListVoices {
                filter: Some(LocaleFilter::locale("en-US")),
            })
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(en, vec!["A", "B"]);

        let selection = GetSelectionHandler::new(catalog).handle(GetSelection);
        assert_eq!(selection.active_filter, LocaleFilter::All);
        assert_eq!(selection.selected_voice.map(|v| v.name).as_deref(), Some("A"));
    }
}
