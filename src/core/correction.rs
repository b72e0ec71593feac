// File: src/core/correction.rs
use crate::core::types::{CorrectionStrategy, PendingEdit, SelectionSnapshot};

/// The value and selection a field should hold after a keystroke is repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

/// Rebuilds the field value with the mapped glyph in place of the raw
/// character the host just inserted.
///
/// `before` is the selection recorded before the edit began, `after` the
/// selection the host reports once its native insertion is done (one past
/// the inserted character). Returns `None` when the edit needs no repair.
pub fn correct(
    pending: &PendingEdit,
    before: SelectionSnapshot,
    after: SelectionSnapshot,
    strategy: CorrectionStrategy,
) -> Option<Correction> {
    if !pending.needs_correction() {
        return None;
    }
    let source = pending.source_char?;
    let mapped = pending.mapped_char?;

    let mut working: Vec<char> = match strategy {
        CorrectionStrategy::ReplaceInserted => pending.value_before_edit.chars().collect(),
        CorrectionStrategy::StripAll => pending
            .value_before_edit
            .chars()
            .filter(|&c| c != source)
            .collect(),
    };

    // Typing over a selection replaces it.
    if before.is_range() {
        let start = before.start.min(working.len());
        let end = before.end.min(working.len());
        working.drain(start..end);
    }

    let at = after.start.saturating_sub(1).min(working.len());
    working.insert(at, mapped);

    let len = working.len();
    Some(Correction {
        value: working.into_iter().collect(),
        selection_start: after.start.min(len),
        selection_end: after.end.min(len),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(source: char, mapped: char, before: &str) -> PendingEdit {
        PendingEdit {
            source_char: Some(source),
            mapped_char: Some(mapped),
            value_before_edit: before.to_string(),
        }
    }

    fn caret(at: usize) -> SelectionSnapshot {
        SelectionSnapshot { start: at, end: at }
    }

    #[test]
    fn test_empty_field() {
        let fix = correct(
            &pending('c', 'm', ""),
            caret(0),
            caret(1),
            CorrectionStrategy::ReplaceInserted,
        )
        .unwrap();
        assert_eq!(fix.value, "m");
        assert_eq!((fix.selection_start, fix.selection_end), (1, 1));
    }

    #[test]
    fn test_mid_text() {
        let fix = correct(
            &pending('c', 'm', "ab"),
            caret(1),
            caret(2),
            CorrectionStrategy::ReplaceInserted,
        )
        .unwrap();
        assert_eq!(fix.value, "amb");
        assert_eq!(fix.selection_start, 2);
    }

    #[test]
    fn test_selection_is_replaced() {
        let fix = correct(
            &pending('c', 'm', "abcdef"),
            SelectionSnapshot { start: 2, end: 4 },
            caret(3),
            CorrectionStrategy::ReplaceInserted,
        )
        .unwrap();
        assert_eq!(fix.value, "abmef");
        assert_eq!((fix.selection_start, fix.selection_end), (3, 3));
    }

    #[test]
    fn test_existing_source_char_is_kept() {
        let fix = correct(
            &pending('c', 'm', "cab"),
            caret(3),
            caret(4),
            CorrectionStrategy::ReplaceInserted,
        )
        .unwrap();
        assert_eq!(fix.value, "cabm");
        assert_eq!(fix.selection_start, 4);
    }

    #[test]
    fn test_strip_all_drops_existing_source_char() {
        let fix = correct(
            &pending('c', 'm', "cab"),
            caret(3),
            caret(4),
            CorrectionStrategy::StripAll,
        )
        .unwrap();
        assert_eq!(fix.value, "abm");
        // The stale caret is clamped to the shorter value.
        assert_eq!((fix.selection_start, fix.selection_end), (3, 3));
    }

    #[test]
    fn test_multibyte_offsets() {
        let fix = correct(
            &pending('k', 'ކ', "ހަ"),
            caret(2),
            caret(3),
            CorrectionStrategy::ReplaceInserted,
        )
        .unwrap();
        assert_eq!(fix.value, "ހަކ");
        assert_eq!(fix.selection_start, 3);
    }

    #[test]
    fn test_no_correction_needed() {
        let same = pending('1', '1', "ab");
        assert!(correct(&same, caret(2), caret(3), CorrectionStrategy::ReplaceInserted).is_none());

        let empty = PendingEdit {
            source_char: None,
            mapped_char: None,
            value_before_edit: "ab".into(),
        };
        assert!(correct(&empty, caret(2), caret(2), CorrectionStrategy::ReplaceInserted).is_none());
    }

    #[test]
    fn test_caret_at_zero_inserts_at_front() {
        // Hosts that report no selection read as zero.
        let fix = correct(
            &pending('c', 'm', "ab"),
            caret(0),
            caret(0),
            CorrectionStrategy::ReplaceInserted,
        )
        .unwrap();
        assert_eq!(fix.value, "mab");
        assert_eq!(fix.selection_start, 0);
    }
}
