// src/host/mod.rs
//
// The surface the engine consumes from whatever owns the text fields.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::core::types::{EventKind, EventTarget, FieldId, ListenerHandle, SelectionSnapshot};

/// An editable single- or multi-line text field.
///
/// Offsets count Unicode scalar values. Hosts that count differently
/// (browsers count UTF-16 code units) convert at this boundary.
pub trait TextField {
    fn value(&self) -> String;

    /// Replaces the whole value. Like a browser, a changed value moves the
    /// caret to the end.
    fn set_value(&mut self, value: &str);

    /// `None` when the field has no selection API (e.g. `type="email"`).
    fn selection_start(&self) -> Option<usize>;

    fn selection_end(&self) -> Option<usize>;

    fn set_selection_range(&mut self, start: usize, end: usize);

    fn selection(&self) -> SelectionSnapshot {
        SelectionSnapshot::new(self.selection_start(), self.selection_end())
    }
}

/// The document hosting the monitored fields.
pub trait Document {
    type Field: TextField;

    /// Fields matching a CSS selector, in document order. Takes `&mut self`
    /// so hosts can register newly discovered elements.
    fn query_selector_all(&mut self, selector: &str) -> Vec<FieldId>;

    /// The focused field, if focus is on a field at all.
    fn active_element(&self) -> Option<FieldId>;

    fn field(&self, id: FieldId) -> Option<&Self::Field>;

    fn field_mut(&mut self, id: FieldId) -> Option<&mut Self::Field>;

    /// Registers interest in `kind` notifications on `target`. The host
    /// delivers them to the engine until the handle is removed.
    fn add_listener(&mut self, target: EventTarget, kind: EventKind) -> ListenerHandle;

    fn remove_listener(&mut self, handle: ListenerHandle);
}
