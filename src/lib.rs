// src/lib.rs

pub mod core;
pub mod hook;
pub mod host;
pub mod layout;
pub mod settings;
pub mod unicode;

pub use crate::core::charmap::CharacterMap;
pub use crate::core::engine::TransliterationEngine;
pub use crate::core::types::{CorrectionStrategy, FieldId, InputType, SelectionSnapshot};
pub use crate::hook::{use_thaana_keyboard, KeyboardHook};
pub use crate::host::memory::{MemoryDocument, MemoryField};
pub use crate::host::{Document, TextField};
pub use crate::settings::KeyboardSettings;
