// File: src/core/charmap.rs
use std::collections::HashMap;

/// The phonetic Thaana layout, keyed by the Latin character on the key cap.
const THAANA_PHONETIC: &[(char, char)] = &[
    ('q', 'ް'), ('w', 'އ'), ('e', 'ެ'), ('r', 'ރ'), ('t', 'ތ'),
    ('y', 'ޔ'), ('u', 'ު'), ('i', 'ި'), ('o', 'ޮ'), ('p', 'ޕ'),
    ('a', 'ަ'), ('s', 'ސ'), ('d', 'ދ'), ('f', 'ފ'), ('g', 'ގ'),
    ('h', 'ހ'), ('j', 'ޖ'), ('k', 'ކ'), ('l', 'ލ'), ('z', 'ޒ'),
    ('x', '×'), ('c', 'ޗ'), ('v', 'ވ'), ('b', 'ބ'), ('n', 'ނ'),
    ('m', 'މ'),
    ('Q', 'ޤ'), ('W', 'ޢ'), ('E', 'ޭ'), ('R', 'ޜ'), ('T', 'ޓ'),
    ('Y', 'ޠ'), ('U', 'ޫ'), ('I', 'ީ'), ('O', 'ޯ'), ('P', '÷'),
    ('A', 'ާ'), ('S', 'ށ'), ('D', 'ޑ'), ('F', 'ﷲ'), ('G', 'ޣ'),
    ('H', 'ޙ'), ('J', 'ޛ'), ('K', 'ޚ'), ('L', 'ޅ'), ('Z', 'ޡ'),
    ('X', 'ޘ'), ('C', 'ޝ'), ('V', 'ޥ'), ('B', 'ޞ'), ('N', 'ޏ'),
    ('M', 'ޟ'),
    (',', '،'), (';', '؛'), ('?', '؟'),
    // Thaana is written right to left, so paired punctuation is mirrored.
    ('<', '>'), ('>', '<'), ('[', ']'), (']', '['),
    ('(', ')'), (')', '('), ('{', '}'), ('}', '{'),
];

/// A fixed single-character substitution table.
///
/// Lookups are total: a character without an entry maps to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMap {
    name: String,
    entries: HashMap<char, char>,
}

impl CharacterMap {
    /// Builds a map from arbitrary `(source, target)` pairs. Later pairs win
    /// when a source character repeats.
    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        Self {
            name: name.into(),
            entries: pairs.into_iter().collect(),
        }
    }

    /// The built-in phonetic Thaana layout.
    pub fn thaana() -> Self {
        Self::from_pairs("thaana-phonetic", THAANA_PHONETIC.iter().copied())
    }

    /// Returns the mapped glyph, or `source` unchanged when it has no entry.
    pub fn lookup(&self, source: char) -> char {
        self.entries.get(&source).copied().unwrap_or(source)
    }

    /// True when typing `source` needs a substitution.
    pub fn is_mapped(&self, source: char) -> bool {
        self.lookup(source) != source
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by source character, for display and export.
    pub fn sorted_entries(&self) -> Vec<(char, char)> {
        let mut pairs: Vec<(char, char)> = self.entries.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        pairs
    }
}

impl Default for CharacterMap {
    fn default() -> Self {
        Self::thaana()
    }
}
