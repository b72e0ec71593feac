// File: src/layout.rs
use crate::core::charmap::CharacterMap;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Errors that can occur when reading or writing a layout file
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layout entry {key:?} -> {value:?}: both sides must be a single character")]
    InvalidEntry { key: String, value: String },

    #[error("Could not replace layout file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// On-disk shape of a layout. Keys and values are strings so the file stays
/// readable; each must hold exactly one character.
#[derive(serde::Serialize, serde::Deserialize)]
struct LayoutFile {
    name: String,
    entries: BTreeMap<String, String>,
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn into_map(file: LayoutFile) -> Result<CharacterMap, LayoutError> {
    let mut pairs = Vec::with_capacity(file.entries.len());
    for (key, value) in file.entries {
        match (single_char(&key), single_char(&value)) {
            (Some(k), Some(v)) => pairs.push((k, v)),
            _ => return Err(LayoutError::InvalidEntry { key, value }),
        }
    }
    Ok(CharacterMap::from_pairs(file.name, pairs))
}

pub fn parse_layout(json: &str) -> Result<CharacterMap, LayoutError> {
    into_map(serde_json::from_str(json)?)
}

pub fn load_layout(path: &Path) -> Result<CharacterMap, LayoutError> {
    let reader = BufReader::new(File::open(path)?);
    into_map(serde_json::from_reader(reader)?)
}

pub fn layout_to_json(map: &CharacterMap) -> Result<String, LayoutError> {
    let file = LayoutFile {
        name: map.name().to_string(),
        entries: map
            .sorted_entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Writes the layout next to `path` and renames it into place, so a reader
/// never sees a half-written file.
pub fn save_layout(map: &CharacterMap, path: &Path) -> Result<(), LayoutError> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let json = layout_to_json(map)?;
    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
    }
    temp_file.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        let json = r#"{ "name": "mini", "entries": { "k": "ކ", "a": "ަ" } }"#;
        let map = parse_layout(json).unwrap();
        assert_eq!(map.name(), "mini");
        assert_eq!(map.len(), 2);
        assert_eq!(map.lookup('k'), 'ކ');
        assert_eq!(map.lookup('z'), 'z');
    }

    #[test]
    fn test_multi_char_entry_is_rejected() {
        let json = r#"{ "name": "bad", "entries": { "sh": "ށ" } }"#;
        match parse_layout(json) {
            Err(LayoutError::InvalidEntry { key, .. }) => assert_eq!(key, "sh"),
            other => panic!("expected InvalidEntry, got {:?}", other),
        }

        let json = r#"{ "name": "bad", "entries": { "k": "" } }"#;
        assert!(matches!(parse_layout(json), Err(LayoutError::InvalidEntry { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_layout("{ not json"), Err(LayoutError::Json(_))));
    }

    #[test]
    fn test_save_and_load_builtin_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts").join("thaana.json");

        let map = CharacterMap::thaana();
        save_layout(&map, &path).unwrap();
        let loaded = load_layout(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_layout(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LayoutError::Io(_)));
    }
}
