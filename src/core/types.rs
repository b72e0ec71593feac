// src/core/types.rs
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Identity of a text field inside its host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub usize);

/// Handle returned by a host when a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Document,
    Field(FieldId),
}

/// The notifications the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired before the host mutates the field (`beforeinput`).
    BeforeInput,
    /// Fired after the host mutated the field (`input`).
    Input,
    /// Document-wide selection change (`selectionchange`).
    SelectionChange,
}

/// The `inputType` of an edit, as named by the Input Events spec.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum InputType {
    InsertText,
    InsertCompositionText,
    InsertReplacementText,
    InsertFromPaste,
    InsertFromDrop,
    InsertLineBreak,
    InsertParagraph,
    DeleteContentBackward,
    DeleteContentForward,
    DeleteByCut,
    HistoryUndo,
    HistoryRedo,
    #[strum(default)]
    Other(String),
}

impl InputType {
    /// Parses an `inputType` string. `#[strum(default)]` makes this total:
    /// names outside the list, the empty one included, land in `Other`.
    pub fn parse(name: &str) -> Self {
        match name.parse() {
            Ok(input_type) => input_type,
            // Not produced while `Other` is the default variant.
            Err(_) => InputType::Other(name.to_string()),
        }
    }

    /// Only typed and IME-composed text is transliterated.
    pub fn is_insertion(&self) -> bool {
        matches!(self, InputType::InsertText | InputType::InsertCompositionText)
    }
}

/// Payload shared by `beforeinput` and `input` notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub input_type: InputType,
    pub data: Option<String>,
}

impl InputEvent {
    pub fn new(input_type: InputType, data: Option<&str>) -> Self {
        Self {
            input_type,
            data: data.map(str::to_string),
        }
    }

    pub fn insert_text(data: &str) -> Self {
        Self::new(InputType::InsertText, Some(data))
    }

    /// The character the host is about to insert: the last one of `data`.
    pub fn last_char(&self) -> Option<char> {
        self.data.as_deref().and_then(|d| d.chars().next_back())
    }
}

/// A notification delivered by the host to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    BeforeInput { field: FieldId, event: InputEvent },
    Input { field: FieldId, event: InputEvent },
    SelectionChange,
}

/// Selection of a field as it was before the current edit began.
/// Offsets count Unicode scalar values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub start: usize,
    pub end: usize,
}

impl SelectionSnapshot {
    /// Absent offsets read as zero; the pair is ordered so `start <= end`.
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        let start = start.unwrap_or(0);
        let end = end.unwrap_or(0);
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn is_range(&self) -> bool {
        self.end > self.start
    }
}

/// The keystroke currently between `beforeinput` and `input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub source_char: Option<char>,
    pub mapped_char: Option<char>,
    pub value_before_edit: String,
}

impl PendingEdit {
    /// True when the host's native insertion has to be rewritten.
    pub fn needs_correction(&self) -> bool {
        matches!((self.source_char, self.mapped_char), (Some(s), Some(m)) if s != m)
    }
}

/// How the working value is rebuilt before the mapped glyph is inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionStrategy {
    /// Rebuild from the pre-edit value, so only the typed character is replaced.
    #[default]
    ReplaceInserted,
    /// Also drop every earlier occurrence of the source character. Kept for
    /// compatibility with fields edited by older releases.
    StripAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_names() {
        assert_eq!(InputType::parse("insertText"), InputType::InsertText);
        assert_eq!(
            InputType::parse("insertCompositionText"),
            InputType::InsertCompositionText
        );
        assert_eq!(
            InputType::parse("deleteContentBackward"),
            InputType::DeleteContentBackward
        );
        assert_eq!(
            InputType::parse("formatBold"),
            InputType::Other("formatBold".to_string())
        );
        assert_eq!(InputType::parse(""), InputType::Other(String::new()));
        assert!(!InputType::parse("inserttext").is_insertion());
    }

    #[test]
    fn test_only_text_insertions_qualify() {
        assert!(InputType::InsertText.is_insertion());
        assert!(InputType::InsertCompositionText.is_insertion());
        assert!(!InputType::InsertFromPaste.is_insertion());
        assert!(!InputType::DeleteContentBackward.is_insertion());
        assert!(!InputType::Other("insertLink".into()).is_insertion());
    }

    #[test]
    fn test_last_char() {
        assert_eq!(InputEvent::insert_text("ab").last_char(), Some('b'));
        assert_eq!(InputEvent::insert_text("").last_char(), None);
        assert_eq!(InputEvent::new(InputType::InsertText, None).last_char(), None);
    }

    #[test]
    fn test_snapshot_normalizes() {
        assert_eq!(
            SelectionSnapshot::new(Some(4), Some(2)),
            SelectionSnapshot { start: 2, end: 4 }
        );
        assert_eq!(SelectionSnapshot::new(None, None), SelectionSnapshot::default());
        assert!(!SelectionSnapshot::new(Some(3), Some(3)).is_range());
        assert!(SelectionSnapshot::new(Some(3), None).is_range());
    }
}
