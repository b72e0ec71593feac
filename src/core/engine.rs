use crate::core::charmap::CharacterMap;
use crate::core::correction::correct;
use crate::core::types::{
    DomEvent, EventKind, EventTarget, FieldId, InputEvent, ListenerHandle, PendingEdit,
    SelectionSnapshot,
};
use crate::host::{Document, TextField};
use crate::settings::KeyboardSettings;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-field bookkeeping between the selection tracker and the edit handlers.
#[derive(Debug)]
struct FieldState {
    snapshot: SelectionSnapshot,
    pending: Option<PendingEdit>,
    listeners: [ListenerHandle; 2],
}

/// Substitutes mapped glyphs for typed characters in every monitored field.
///
/// The host delivers `beforeinput`, `input` and `selectionchange` through
/// [`TransliterationEngine::handle_event`]. Each keystroke moves one field
/// through Idle -> PreEdit-Captured -> Corrected -> Idle.
pub struct TransliterationEngine {
    settings: KeyboardSettings,
    map: Arc<CharacterMap>,
    fields: HashMap<FieldId, FieldState>,
    selection_listener: Option<ListenerHandle>,
}

impl TransliterationEngine {
    /// Creates the engine and, when `settings.auto_start` is set, attaches to
    /// the matching fields right away.
    pub fn new<D: Document>(settings: KeyboardSettings, map: Arc<CharacterMap>, doc: &mut D) -> Self {
        let auto_start = settings.auto_start;
        let mut engine = Self {
            settings,
            map,
            fields: HashMap::new(),
            selection_listener: None,
        };
        if auto_start {
            engine.start(doc);
        }
        engine
    }

    /// Default settings with the built-in Thaana layout.
    pub fn with_defaults<D: Document>(doc: &mut D) -> Self {
        Self::new(KeyboardSettings::default(), Arc::new(CharacterMap::thaana()), doc)
    }

    /// Subscribes to every field matching the target selector. Returns the
    /// number of newly monitored fields; calling it again only picks up fields
    /// that appeared since.
    pub fn start<D: Document>(&mut self, doc: &mut D) -> usize {
        let matched = doc.query_selector_all(&self.settings.target_selector);
        let mut attached = 0;
        for id in matched {
            if self.fields.contains_key(&id) {
                continue;
            }
            let listeners = [
                doc.add_listener(EventTarget::Field(id), EventKind::BeforeInput),
                doc.add_listener(EventTarget::Field(id), EventKind::Input),
            ];
            let snapshot = doc.field(id).map(TextField::selection).unwrap_or_default();
            self.fields.insert(id, FieldState { snapshot, pending: None, listeners });
            attached += 1;
        }
        if self.selection_listener.is_none() {
            self.selection_listener =
                Some(doc.add_listener(EventTarget::Document, EventKind::SelectionChange));
        }
        log::debug!(
            "attached to {} field(s) matching {:?} ({} monitored)",
            attached,
            self.settings.target_selector,
            self.fields.len()
        );
        attached
    }

    /// Releases every subscription. The engine can be started again later.
    pub fn dispose<D: Document>(&mut self, doc: &mut D) {
        for (_, state) in self.fields.drain() {
            for handle in state.listeners {
                doc.remove_listener(handle);
            }
        }
        if let Some(handle) = self.selection_listener.take() {
            doc.remove_listener(handle);
        }
        log::debug!("engine disposed");
    }

    pub fn is_running(&self) -> bool {
        self.selection_listener.is_some()
    }

    pub fn settings(&self) -> &KeyboardSettings {
        &self.settings
    }

    pub fn character_map(&self) -> &CharacterMap {
        &self.map
    }

    pub fn is_monitored(&self, field: FieldId) -> bool {
        self.fields.contains_key(&field)
    }

    /// Monitored fields in ascending id order.
    pub fn monitored_fields(&self) -> Vec<FieldId> {
        let mut ids: Vec<FieldId> = self.fields.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The last selection recorded for `field`.
    pub fn snapshot(&self, field: FieldId) -> Option<SelectionSnapshot> {
        self.fields.get(&field).map(|s| s.snapshot)
    }

    /// The keystroke captured for `field` and not yet corrected.
    pub fn pending(&self, field: FieldId) -> Option<&PendingEdit> {
        self.fields.get(&field).and_then(|s| s.pending.as_ref())
    }

    pub fn handle_event<D: Document>(&mut self, doc: &mut D, event: &DomEvent) {
        match event {
            DomEvent::SelectionChange => self.on_selection_change(doc),
            DomEvent::BeforeInput { field, event } => self.on_before_input(doc, *field, event),
            DomEvent::Input { field, event } => self.on_input(doc, *field, event),
        }
    }

    /// Records the focused field's selection. This is the only source of the
    /// pre-edit selection: by the time `input` fires the host has moved it.
    pub fn on_selection_change<D: Document>(&mut self, doc: &D) {
        let Some(active) = doc.active_element() else {
            return;
        };
        let Some(state) = self.fields.get_mut(&active) else {
            return;
        };
        if let Some(field) = doc.field(active) {
            state.snapshot = field.selection();
            log::trace!("{:?} selection {:?}", active, state.snapshot);
        }
    }

    /// Captures the character about to be inserted. Never touches the field.
    pub fn on_before_input<D: Document>(&mut self, doc: &D, field: FieldId, event: &InputEvent) {
        let Some(state) = self.fields.get_mut(&field) else {
            return;
        };
        if !event.input_type.is_insertion() {
            state.pending = None;
            return;
        }
        let Some(value) = doc.field(field).map(TextField::value) else {
            return;
        };
        let source_char = event.last_char();
        let pending = PendingEdit {
            source_char,
            mapped_char: source_char.map(|c| self.map.lookup(c)),
            value_before_edit: value,
        };
        log::trace!("{:?} captured {:?}", field, pending);
        state.pending = Some(pending);
    }

    /// Rewrites the host's native insertion with the mapped glyph.
    pub fn on_input<D: Document>(&mut self, doc: &mut D, field: FieldId, event: &InputEvent) {
        let Some(state) = self.fields.get_mut(&field) else {
            return;
        };
        let Some(pending) = state.pending.take() else {
            return;
        };
        if !event.input_type.is_insertion() {
            return;
        }
        let Some(target) = doc.field_mut(field) else {
            return;
        };

        let after = target.selection();
        let Some(fix) = correct(&pending, state.snapshot, after, self.settings.correction) else {
            return;
        };

        target.set_value(&fix.value);
        target.set_selection_range(fix.selection_start, fix.selection_end);
        log::debug!(
            "{:?}: {:?} -> {:?} at {}",
            field,
            pending.source_char,
            pending.mapped_char,
            fix.selection_start
        );
    }
}
