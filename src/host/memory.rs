// File: src/host/memory.rs
//
// An in-process document that edits fields the way a browser does and
// delivers the same notification sequence per keystroke.

use crate::core::engine::TransliterationEngine;
use crate::core::types::{
    DomEvent, EventKind, EventTarget, FieldId, InputEvent, InputType, ListenerHandle,
    SelectionSnapshot,
};
use crate::host::{Document, TextField};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryField {
    value: String,
    selection_start: usize,
    selection_end: usize,
}

impl MemoryField {
    pub fn new(value: &str) -> Self {
        let end = value.chars().count();
        Self {
            value: value.to_string(),
            selection_start: end,
            selection_end: end,
        }
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Applies the host's own behavior for an edit. Returns false when the
    /// edit kind leaves the field untouched.
    fn apply_native(&mut self, input_type: &InputType, data: Option<&str>) -> bool {
        let mut chars: Vec<char> = self.value.chars().collect();
        let (start, end) = (self.selection_start, self.selection_end);
        let caret = match input_type {
            InputType::InsertText
            | InputType::InsertCompositionText
            | InputType::InsertReplacementText
            | InputType::InsertFromPaste
            | InputType::InsertFromDrop => {
                let text: Vec<char> = data.unwrap_or_default().chars().collect();
                let inserted = text.len();
                chars.splice(start..end, text);
                start + inserted
            }
            InputType::InsertLineBreak | InputType::InsertParagraph => {
                chars.splice(start..end, ['\n']);
                start + 1
            }
            InputType::DeleteContentBackward => {
                if start < end {
                    chars.drain(start..end);
                    start
                } else if start > 0 {
                    chars.remove(start - 1);
                    start - 1
                } else {
                    return false;
                }
            }
            InputType::DeleteContentForward | InputType::DeleteByCut => {
                if start < end {
                    chars.drain(start..end);
                } else if start < chars.len() && *input_type == InputType::DeleteContentForward {
                    chars.remove(start);
                } else {
                    return false;
                }
                start
            }
            InputType::HistoryUndo | InputType::HistoryRedo | InputType::Other(_) => return false,
        };
        self.value = chars.into_iter().collect();
        self.selection_start = caret;
        self.selection_end = caret;
        true
    }
}

impl TextField for MemoryField {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            let end = self.char_len();
            self.selection_start = end;
            self.selection_end = end;
        }
    }

    fn selection_start(&self) -> Option<usize> {
        Some(self.selection_start)
    }

    fn selection_end(&self) -> Option<usize> {
        Some(self.selection_end)
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let end = end.min(len);
        self.selection_start = start.min(end);
        self.selection_end = end;
    }
}

#[derive(Debug, Clone)]
struct MemoryElement {
    id: Option<String>,
    classes: Vec<String>,
    field: MemoryField,
}

impl MemoryElement {
    /// Supports `.class`, `#id` and comma-separated lists of those.
    fn matches(&self, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            if let Some(class) = part.strip_prefix('.') {
                self.classes.iter().any(|c| c == class)
            } else if let Some(id) = part.strip_prefix('#') {
                self.id.as_deref() == Some(id)
            } else {
                false
            }
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    active: Option<FieldId>,
    listeners: HashMap<ListenerHandle, (EventTarget, EventKind)>,
    next_listener: u64,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty field carrying the given space-separated class list.
    pub fn add_field(&mut self, classes: &str) -> FieldId {
        self.push_element(None, classes)
    }

    pub fn add_field_with_id(&mut self, id: &str, classes: &str) -> FieldId {
        self.push_element(Some(id.to_string()), classes)
    }

    fn push_element(&mut self, id: Option<String>, classes: &str) -> FieldId {
        self.elements.push(MemoryElement {
            id,
            classes: classes.split_whitespace().map(str::to_string).collect(),
            field: MemoryField::default(),
        });
        FieldId(self.elements.len() - 1)
    }

    pub fn value(&self, id: FieldId) -> String {
        self.field(id).map(TextField::value).unwrap_or_default()
    }

    pub fn selection(&self, id: FieldId) -> Option<SelectionSnapshot> {
        self.field(id).map(TextField::selection)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listener(&self, target: EventTarget, kind: EventKind) -> bool {
        self.listeners.values().any(|&(t, k)| t == target && k == kind)
    }

    fn dispatch(&mut self, engine: &mut TransliterationEngine, event: DomEvent) {
        let (target, kind) = match &event {
            DomEvent::BeforeInput { field, .. } => (EventTarget::Field(*field), EventKind::BeforeInput),
            DomEvent::Input { field, .. } => (EventTarget::Field(*field), EventKind::Input),
            DomEvent::SelectionChange => (EventTarget::Document, EventKind::SelectionChange),
        };
        if self.has_listener(target, kind) {
            engine.handle_event(self, &event);
        }
    }

    /// Moves focus to `id`, which places the caret and notifies listeners.
    pub fn focus(&mut self, engine: &mut TransliterationEngine, id: FieldId) {
        if self.field(id).is_none() || self.active == Some(id) {
            return;
        }
        self.active = Some(id);
        self.dispatch(engine, DomEvent::SelectionChange);
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Assigns the value programmatically; no edit events fire.
    pub fn set_text(&mut self, engine: &mut TransliterationEngine, id: FieldId, value: &str) {
        if let Some(field) = self.field_mut(id) {
            field.set_value(value);
            self.dispatch(engine, DomEvent::SelectionChange);
        }
    }

    /// Focuses `id` and selects `[start, end)`, as a mouse drag or
    /// shift+arrow would.
    pub fn select(&mut self, engine: &mut TransliterationEngine, id: FieldId, start: usize, end: usize) {
        self.focus(engine, id);
        if let Some(field) = self.field_mut(id) {
            field.set_selection_range(start, end);
            self.dispatch(engine, DomEvent::SelectionChange);
        }
    }

    /// Types `text` one keystroke per character.
    pub fn type_text(&mut self, engine: &mut TransliterationEngine, id: FieldId, text: &str) {
        for c in text.chars() {
            let key = c.to_string();
            self.edit(engine, id, InputType::InsertText, Some(&key));
        }
    }

    /// Commits `text` through an input method composition.
    pub fn compose(&mut self, engine: &mut TransliterationEngine, id: FieldId, text: &str) {
        self.edit(engine, id, InputType::InsertCompositionText, Some(text));
    }

    pub fn paste(&mut self, engine: &mut TransliterationEngine, id: FieldId, text: &str) {
        self.edit(engine, id, InputType::InsertFromPaste, Some(text));
    }

    pub fn backspace(&mut self, engine: &mut TransliterationEngine, id: FieldId) {
        self.edit(engine, id, InputType::DeleteContentBackward, None);
    }

    pub fn delete_forward(&mut self, engine: &mut TransliterationEngine, id: FieldId) {
        self.edit(engine, id, InputType::DeleteContentForward, None);
    }

    /// One user edit: `beforeinput`, the native mutation, `input`, then the
    /// selection change the mutation caused.
    pub fn edit(
        &mut self,
        engine: &mut TransliterationEngine,
        id: FieldId,
        input_type: InputType,
        data: Option<&str>,
    ) {
        if self.field(id).is_none() {
            return;
        }
        self.focus(engine, id);

        let event = InputEvent::new(input_type, data);
        self.dispatch(engine, DomEvent::BeforeInput { field: id, event: event.clone() });

        let changed = self.elements[id.0].field.apply_native(&event.input_type, data);
        if !changed {
            return;
        }
        self.dispatch(engine, DomEvent::Input { field: id, event });
        self.dispatch(engine, DomEvent::SelectionChange);
    }
}

impl Document for MemoryDocument {
    type Field = MemoryField;

    fn query_selector_all(&mut self, selector: &str) -> Vec<FieldId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.matches(selector))
            .map(|(i, _)| FieldId(i))
            .collect()
    }

    fn active_element(&self) -> Option<FieldId> {
        self.active
    }

    fn field(&self, id: FieldId) -> Option<&MemoryField> {
        self.elements.get(id.0).map(|el| &el.field)
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut MemoryField> {
        self.elements.get_mut(id.0).map(|el| &mut el.field)
    }

    fn add_listener(&mut self, target: EventTarget, kind: EventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(handle, (target, kind));
        handle
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: &str, start: usize, end: usize) -> MemoryField {
        let mut f = MemoryField::new(value);
        f.set_selection_range(start, end);
        f
    }

    #[test]
    fn test_native_insert_replaces_selection() {
        let mut f = field("abcdef", 2, 4);
        assert!(f.apply_native(&InputType::InsertText, Some("x")));
        assert_eq!(f.value(), "abxef");
        assert_eq!(f.selection(), SelectionSnapshot { start: 3, end: 3 });
    }

    #[test]
    fn test_native_backspace() {
        let mut f = field("abc", 2, 2);
        assert!(f.apply_native(&InputType::DeleteContentBackward, None));
        assert_eq!(f.value(), "ac");
        assert_eq!(f.selection_start(), Some(1));

        let mut at_start = field("abc", 0, 0);
        assert!(!at_start.apply_native(&InputType::DeleteContentBackward, None));
        assert_eq!(at_start.value(), "abc");
    }

    #[test]
    fn test_native_delete_forward() {
        let mut f = field("abc", 1, 1);
        assert!(f.apply_native(&InputType::DeleteContentForward, None));
        assert_eq!(f.value(), "ac");
        assert_eq!(f.selection_start(), Some(1));

        let mut at_end = field("abc", 3, 3);
        assert!(!at_end.apply_native(&InputType::DeleteContentForward, None));
    }

    #[test]
    fn test_set_value_moves_caret_to_end() {
        let mut f = field("abc", 1, 1);
        f.set_value("abcd");
        assert_eq!(f.selection(), SelectionSnapshot { start: 4, end: 4 });
        f.set_selection_range(2, 2);
        f.set_value("abcd");
        assert_eq!(f.selection_start(), Some(2));
    }

    #[test]
    fn test_selection_range_is_clamped() {
        let f = field("ab", 5, 9);
        assert_eq!(f.selection(), SelectionSnapshot { start: 2, end: 2 });
        let f = field("abcd", 3, 1);
        assert_eq!(f.selection(), SelectionSnapshot { start: 1, end: 1 });
    }

    #[test]
    fn test_selector_matching() {
        let mut doc = MemoryDocument::new();
        let a = doc.add_field("thaana-keyboard");
        let b = doc.add_field_with_id("notes", "wide");
        let _c = doc.add_field("thaana-keyboard-like");

        assert_eq!(doc.query_selector_all(".thaana-keyboard"), vec![a]);
        assert_eq!(doc.query_selector_all("#notes"), vec![b]);
        assert_eq!(doc.query_selector_all(".thaana-keyboard, #notes"), vec![a, b]);
        assert!(doc.query_selector_all("textarea").is_empty());
    }

    #[test]
    fn test_listeners() {
        let mut doc = MemoryDocument::new();
        let id = doc.add_field("x");
        let handle = doc.add_listener(EventTarget::Field(id), EventKind::Input);
        assert!(doc.has_listener(EventTarget::Field(id), EventKind::Input));
        assert!(!doc.has_listener(EventTarget::Field(id), EventKind::BeforeInput));
        doc.remove_listener(handle);
        assert_eq!(doc.listener_count(), 0);
    }
}
