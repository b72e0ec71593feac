// File: src/host/web.rs
//
// Browser host over <input> and <textarea> elements, exported to JavaScript
// as `ThaanaKeyboard`.

use crate::core::charmap::CharacterMap;
use crate::core::engine::TransliterationEngine;
use crate::core::types::{
    DomEvent, EventKind, EventTarget, FieldId, InputEvent, InputType, ListenerHandle,
};
use crate::host::{Document, TextField};
use crate::settings::{KeyboardSettings, DEFAULT_TARGET_SELECTOR};
use crate::unicode::{char_to_utf16_offset, utf16_to_char_offset};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

pub enum WebField {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl WebField {
    fn from_element(element: Element) -> Option<Self> {
        match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => Some(WebField::Input(input)),
            Err(element) => element.dyn_into::<HtmlTextAreaElement>().ok().map(WebField::TextArea),
        }
    }

    fn element(&self) -> &Element {
        match self {
            WebField::Input(e) => e.as_ref(),
            WebField::TextArea(e) => e.as_ref(),
        }
    }

    fn raw_selection(&self) -> (Option<u32>, Option<u32>) {
        let (start, end) = match self {
            WebField::Input(e) => (e.selection_start(), e.selection_end()),
            WebField::TextArea(e) => (e.selection_start(), e.selection_end()),
        };
        (start.ok().flatten(), end.ok().flatten())
    }
}

impl TextField for WebField {
    fn value(&self) -> String {
        match self {
            WebField::Input(e) => e.value(),
            WebField::TextArea(e) => e.value(),
        }
    }

    fn set_value(&mut self, value: &str) {
        match self {
            WebField::Input(e) => e.set_value(value),
            WebField::TextArea(e) => e.set_value(value),
        }
    }

    fn selection_start(&self) -> Option<usize> {
        let (start, _) = self.raw_selection();
        start.map(|u| utf16_to_char_offset(&self.value(), u as usize))
    }

    fn selection_end(&self) -> Option<usize> {
        let (_, end) = self.raw_selection();
        end.map(|u| utf16_to_char_offset(&self.value(), u as usize))
    }

    fn set_selection_range(&mut self, start: usize, end: usize) {
        let value = self.value();
        let start = char_to_utf16_offset(&value, start) as u32;
        let end = char_to_utf16_offset(&value, end) as u32;
        let result = match self {
            WebField::Input(e) => e.set_selection_range(start, end),
            WebField::TextArea(e) => e.set_selection_range(start, end),
        };
        if result.is_err() {
            log::warn!("field rejected selection range {}..{}", start, end);
        }
    }
}

struct Registration {
    target: web_sys::EventTarget,
    name: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

pub struct WebDocument {
    document: web_sys::Document,
    fields: Vec<WebField>,
    listeners: HashMap<ListenerHandle, Registration>,
    next_listener: u64,
    shared: Weak<Shared>,
}

impl WebDocument {
    fn field_id_of(&self, element: &Element) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.element() == element)
            .map(FieldId)
    }
}

impl Document for WebDocument {
    type Field = WebField;

    fn query_selector_all(&mut self, selector: &str) -> Vec<FieldId> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            log::warn!("invalid selector {:?}", selector);
            return Vec::new();
        };
        let mut ids = Vec::new();
        for i in 0..nodes.length() {
            let Some(element) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(id) = self.field_id_of(&element) {
                ids.push(id);
            } else if let Some(field) = WebField::from_element(element) {
                self.fields.push(field);
                ids.push(FieldId(self.fields.len() - 1));
            }
        }
        ids
    }

    fn active_element(&self) -> Option<FieldId> {
        self.document
            .active_element()
            .and_then(|element| self.field_id_of(&element))
    }

    fn field(&self, id: FieldId) -> Option<&WebField> {
        self.fields.get(id.0)
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut WebField> {
        self.fields.get_mut(id.0)
    }

    fn add_listener(&mut self, target: EventTarget, kind: EventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;

        let js_target: web_sys::EventTarget = match target {
            EventTarget::Document => self.document.clone().into(),
            EventTarget::Field(id) => match self.fields.get(id.0) {
                Some(field) => field.element().clone().into(),
                None => return handle,
            },
        };
        let name = match kind {
            EventKind::BeforeInput => "beforeinput",
            EventKind::Input => "input",
            EventKind::SelectionChange => "selectionchange",
        };

        let shared = self.shared.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let (Some(shared), Some(dom_event)) = (shared.upgrade(), to_dom_event(target, kind, &event)) {
                shared.dispatch(dom_event);
            }
        });
        if js_target
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("could not listen for {}", name);
        }
        self.listeners.insert(handle, Registration { target: js_target, name, closure });
        handle
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        if let Some(reg) = self.listeners.remove(&handle) {
            if reg
                .target
                .remove_event_listener_with_callback(reg.name, reg.closure.as_ref().unchecked_ref())
                .is_err()
            {
                log::warn!("could not stop listening for {}", reg.name);
            }
        }
    }
}

impl Drop for WebDocument {
    fn drop(&mut self) {
        // A dropped closure must not stay registered with the browser.
        let handles: Vec<ListenerHandle> = self.listeners.keys().copied().collect();
        for handle in handles {
            self.remove_listener(handle);
        }
    }
}

fn to_dom_event(target: EventTarget, kind: EventKind, event: &web_sys::Event) -> Option<DomEvent> {
    match (target, kind) {
        (_, EventKind::SelectionChange) => Some(DomEvent::SelectionChange),
        (EventTarget::Field(field), EventKind::BeforeInput | EventKind::Input) => {
            let input = event.dyn_ref::<web_sys::InputEvent>()?;
            let event = InputEvent::new(InputType::parse(&input.input_type()), input.data().as_deref());
            Some(if kind == EventKind::BeforeInput {
                DomEvent::BeforeInput { field, event }
            } else {
                DomEvent::Input { field, event }
            })
        }
        (EventTarget::Document, _) => None,
    }
}

struct Shared {
    engine: RefCell<Option<TransliterationEngine>>,
    doc: RefCell<WebDocument>,
}

impl Shared {
    fn dispatch(&self, event: DomEvent) {
        let (Ok(mut engine), Ok(mut doc)) = (self.engine.try_borrow_mut(), self.doc.try_borrow_mut())
        else {
            log::warn!("dropping re-entrant {:?}", event);
            return;
        };
        if let Some(engine) = engine.as_mut() {
            engine.handle_event(&mut *doc, &event);
        }
    }
}

/// The keyboard as seen from JavaScript:
/// `new ThaanaKeyboard(".thaana-keyboard", true)`.
#[wasm_bindgen]
pub struct ThaanaKeyboard {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl ThaanaKeyboard {
    #[wasm_bindgen(constructor)]
    pub fn new(target_selector: Option<String>, auto_start: Option<bool>) -> Result<ThaanaKeyboard, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("ThaanaKeyboard needs a document"))?;

        let settings = KeyboardSettings::new(
            target_selector.as_deref().unwrap_or(DEFAULT_TARGET_SELECTOR),
            auto_start.unwrap_or(true),
        );
        let shared = Rc::new_cyclic(|weak| Shared {
            engine: RefCell::new(None),
            doc: RefCell::new(WebDocument {
                document,
                fields: Vec::new(),
                listeners: HashMap::new(),
                next_listener: 0,
                shared: weak.clone(),
            }),
        });

        let engine = {
            let mut doc = shared.doc.borrow_mut();
            TransliterationEngine::new(settings, Arc::new(CharacterMap::thaana()), &mut *doc)
        };
        *shared.engine.borrow_mut() = Some(engine);
        Ok(ThaanaKeyboard { shared })
    }

    /// Attaches to matching fields; returns how many were newly attached.
    pub fn start(&self) -> u32 {
        let mut engine = self.shared.engine.borrow_mut();
        let mut doc = self.shared.doc.borrow_mut();
        engine.as_mut().map_or(0, |e| e.start(&mut *doc) as u32)
    }

    pub fn dispose(&self) {
        let mut engine = self.shared.engine.borrow_mut();
        let mut doc = self.shared.doc.borrow_mut();
        if let Some(engine) = engine.as_mut() {
            engine.dispose(&mut *doc);
        }
    }
}
