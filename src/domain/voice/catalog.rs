//! Voice Context - Catalog

use super::{LocaleFilter, VoiceDescriptor};

/// 音色目录
///
/// 不变量:
/// - 每次刷新整体替换，不做增量合并
/// - locales 第一项永远是 `LocaleFilter::All`，其余按首次出现顺序去重
/// - 过滤结果是视图，每次调用重新计算
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<VoiceDescriptor>,
    locales: Vec<LocaleFilter>,
}

impl VoiceCatalog {
    pub fn new(voices: Vec<VoiceDescriptor>) -> Self {
        let mut locales = vec![LocaleFilter::All];
        for voice in &voices {
            let filter = LocaleFilter::locale(voice.locale.clone());
            if !locales.contains(&filter) {
                locales.push(filter);
            }
        }
        Self { voices, locales }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    pub fn locales(&self) -> &[LocaleFilter] {
        &self.locales
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// 按区域过滤
    pub fn filtered(&self, filter: &LocaleFilter) -> Vec<&VoiceDescriptor> {
        self.voices.iter().filter(|v| filter.matches(v)).collect()
    }

    /// 未过滤列表中的第一个音色
    pub fn default_voice(&self) -> Option<&VoiceDescriptor> {
        self.voices.first()
    }

    pub fn default_filter(&self) -> &LocaleFilter {
        &self.locales[0]
    }

    pub fn find(&self, name: &str) -> Option<&VoiceDescriptor> {
        self.voices.iter().find(|v| v.name == name)
    }

    pub fn has_locale(&self, filter: &LocaleFilter) -> bool {
        self.locales.contains(filter)
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VoiceCatalog {
        VoiceCatalog::new(vec![
            VoiceDescriptor::new("A", "en-US"),
            VoiceDescriptor::new("B", "en-US"),
            VoiceDescriptor::new("C", "fr-FR"),
        ])
    }

    #[test]
    fn test_locales_derived_in_first_appearance_order() {
        let catalog = sample();
        assert_eq!(
            catalog.locales(),
            &[
                LocaleFilter::All,
                LocaleFilter::locale("en-US"),
                LocaleFilter::locale("fr-FR"),
            ]
        );
        assert_eq!(catalog.default_filter(), &LocaleFilter::All);
        assert_eq!(catalog.default_voice().map(|v| v.name.as_str()), Some("A"));
    }

    #[test]
    fn test_locales_interleaved() {
        let catalog = VoiceCatalog::new(vec![
            VoiceDescriptor::new("x", "de-DE"),
            VoiceDescriptor::new("y", "ja-JP"),
            VoiceDescriptor::new("z", "de-DE"),
        ]);
        let tags: Vec<String> = catalog.locales().iter().map(|l| l.to_string()).collect();
        assert_eq!(tags, vec!["All", "de-DE", "ja-JP"]);
    }

    #[test]
    fn test_filtered_all_returns_everything() {
        let catalog = sample();
        let names: Vec<&str> = catalog
            .filtered(&LocaleFilter::All)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_filtered_by_locale() {
        let catalog = sample();
        let en: Vec<&str> = catalog
            .filtered(&LocaleFilter::locale("en-US"))
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(en, vec!["A", "B"]);

        let fr = catalog.filtered(&LocaleFilter::locale("fr-FR"));
        assert_eq!(fr.len(), 1);
        assert_eq!(fr[0].name, "C");

        assert!(catalog.filtered(&LocaleFilter::locale("es-ES")).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = VoiceCatalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.locales(), &[LocaleFilter::All]);
        assert!(catalog.default_voice().is_none());
    }
}
