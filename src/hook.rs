// File: src/hook.rs
//
// Lifecycle glue for component frameworks: attach when a component becomes
// active, re-attach when its selector changes, release on unmount.

use crate::core::charmap::CharacterMap;
use crate::core::engine::TransliterationEngine;
use crate::host::Document;
use crate::settings::KeyboardSettings;
use std::sync::Arc;

pub struct KeyboardHook {
    /// Template for every mounted engine. Its `target_selector` is replaced
    /// by the selector of each `use_effect` call and `auto_start` is forced.
    settings: KeyboardSettings,
    map: Arc<CharacterMap>,
    mounted: Option<(String, TransliterationEngine)>,
}

impl KeyboardHook {
    /// `settings.target_selector` and `settings.auto_start` never reach an
    /// engine: each `use_effect` call names the selector and always starts.
    pub fn new(settings: KeyboardSettings, map: Arc<CharacterMap>) -> Self {
        Self {
            settings,
            map,
            mounted: None,
        }
    }

    /// Runs on every render. Attaches only when `selector` differs from the
    /// one of the previous run; returns whether it attached.
    pub fn use_effect<D: Document>(&mut self, doc: &mut D, selector: &str) -> bool {
        if let Some((current, _)) = &self.mounted {
            if current == selector {
                return false;
            }
        }
        self.unmount(doc);

        let settings = KeyboardSettings {
            target_selector: selector.to_string(),
            auto_start: true,
            ..self.settings.clone()
        };
        let engine = TransliterationEngine::new(settings, Arc::clone(&self.map), doc);
        log::debug!("hook mounted for {:?}", selector);
        self.mounted = Some((selector.to_string(), engine));
        true
    }

    pub fn unmount<D: Document>(&mut self, doc: &mut D) {
        if let Some((_, mut engine)) = self.mounted.take() {
            engine.dispose(doc);
        }
    }

    pub fn engine(&self) -> Option<&TransliterationEngine> {
        self.mounted.as_ref().map(|(_, engine)| engine)
    }

    pub fn engine_mut(&mut self) -> Option<&mut TransliterationEngine> {
        self.mounted.as_mut().map(|(_, engine)| engine)
    }
}

/// A hook with default settings and the built-in Thaana layout.
pub fn use_thaana_keyboard() -> KeyboardHook {
    KeyboardHook::new(KeyboardSettings::default(), Arc::new(CharacterMap::thaana()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryDocument;

    #[test]
    fn test_effect_runs_once_per_selector() {
        let mut doc = MemoryDocument::new();
        let field = doc.add_field("thaana-keyboard");
        let mut hook = use_thaana_keyboard();

        assert!(hook.use_effect(&mut doc, ".thaana-keyboard"));
        assert!(!hook.use_effect(&mut doc, ".thaana-keyboard"));
        assert_eq!(doc.listener_count(), 3);

        let engine = hook.engine_mut().unwrap();
        doc.type_text(engine, field, "k");
        assert_eq!(doc.value(field), "ކ");
    }

    #[test]
    fn test_selector_change_replaces_subscriptions() {
        let mut doc = MemoryDocument::new();
        let first = doc.add_field("thaana-keyboard");
        let second = doc.add_field("dhivehi");
        let mut hook = use_thaana_keyboard();

        hook.use_effect(&mut doc, ".thaana-keyboard");
        assert!(hook.use_effect(&mut doc, ".dhivehi"));
        assert_eq!(doc.listener_count(), 3);
        assert_eq!(hook.engine().unwrap().monitored_fields(), vec![second]);

        let engine = hook.engine_mut().unwrap();
        doc.type_text(engine, first, "k");
        assert_eq!(doc.value(first), "k");
    }

    #[test]
    fn test_effect_selector_wins_over_settings() {
        let mut doc = MemoryDocument::new();
        let field = doc.add_field("thaana-keyboard");
        let other = doc.add_field("other");
        let settings = KeyboardSettings {
            correction: crate::core::types::CorrectionStrategy::StripAll,
            ..KeyboardSettings::new(".other", false)
        };
        let mut hook = KeyboardHook::new(settings, Arc::new(CharacterMap::thaana()));

        assert!(hook.use_effect(&mut doc, ".thaana-keyboard"));
        let engine = hook.engine_mut().unwrap();
        assert!(engine.is_running());
        assert_eq!(engine.settings().target_selector, ".thaana-keyboard");
        assert_eq!(engine.settings().correction, crate::core::types::CorrectionStrategy::StripAll);
        assert_eq!(engine.monitored_fields(), vec![field]);

        doc.type_text(engine, other, "k");
        assert_eq!(doc.value(other), "k");
    }

    #[test]
    fn test_unmount() {
        let mut doc = MemoryDocument::new();
        doc.add_field("thaana-keyboard");
        let mut hook = use_thaana_keyboard();
        hook.use_effect(&mut doc, ".thaana-keyboard");
        hook.unmount(&mut doc);
        assert_eq!(doc.listener_count(), 0);
        assert!(hook.engine().is_none());
    }
}
