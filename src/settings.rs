// Keyboard settings
// Selector, start-up and correction options, loaded from TOML

use crate::core::charmap::CharacterMap;
use crate::core::types::CorrectionStrategy;
use crate::layout::{load_layout, LayoutError};
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET_SELECTOR: &str = ".thaana-keyboard";

/// Options for one engine instance.
///
/// Loaded from a TOML file (default: ~/.config/thaana-keyboard/settings.toml)
/// or built directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardSettings {
    /// Which fields are monitored
    pub target_selector: String,

    /// Attach as soon as the engine is constructed
    pub auto_start: bool,

    pub correction: CorrectionStrategy,

    /// JSON layout to use instead of the built-in table
    pub layout_path: Option<PathBuf>,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            target_selector: DEFAULT_TARGET_SELECTOR.to_string(),
            auto_start: true,
            correction: CorrectionStrategy::default(),
            layout_path: None,
        }
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    keyboard: Option<KeyboardSection>,

    #[serde(default)]
    layout: Option<LayoutSection>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct KeyboardSection {
    #[serde(default)]
    target_selector: Option<String>,
    #[serde(default)]
    auto_start: Option<bool>,
    #[serde(default)]
    correction: Option<CorrectionStrategy>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct LayoutSection {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl KeyboardSettings {
    pub fn new(target_selector: &str, auto_start: bool) -> Self {
        Self {
            target_selector: target_selector.to_string(),
            auto_start,
            ..Self::default()
        }
    }

    /// Load settings from a TOML file. A relative layout path is resolved
    /// against the settings file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        if let Some(dir) = path.as_ref().parent() {
            settings.layout_path = settings
                .layout_path
                .take()
                .map(|p| if p.is_relative() { dir.join(p) } else { p });
        }
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::default();

        if let Some(keyboard) = parsed.keyboard {
            if let Some(selector) = keyboard.target_selector {
                settings.target_selector = selector;
            }
            if let Some(auto_start) = keyboard.auto_start {
                settings.auto_start = auto_start;
            }
            if let Some(correction) = keyboard.correction {
                settings.correction = correction;
            }
        }

        if let Some(layout) = parsed.layout {
            settings.layout_path = layout.path;
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("thaana-keyboard").join("settings.toml"))
    }

    /// Load from the default location, or defaults when there is no file
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// The configured layout, or the built-in Thaana table.
    pub fn load_layout(&self) -> Result<CharacterMap, SettingsError> {
        match &self.layout_path {
            Some(path) => {
                let map = load_layout(path)?;
                log::info!("loaded layout {:?} from {}", map.name(), path.display());
                Ok(map)
            }
            None => Ok(CharacterMap::thaana()),
        }
    }
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Thaana keyboard settings
# Place this file at: ~/.config/thaana-keyboard/settings.toml

[keyboard]
# Fields matching this selector are transliterated
target_selector = ".thaana-keyboard"

# Attach as soon as the keyboard is created
auto_start = true

# "replace-inserted": only the typed character is replaced
# "strip-all": also removes earlier copies of the typed Latin character
correction = "replace-inserted"

[layout]
# Optional JSON layout; the built-in phonetic table is used when unset
# path = "layouts/thaana.json"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = KeyboardSettings::default();
        assert_eq!(settings.target_selector, ".thaana-keyboard");
        assert!(settings.auto_start);
        assert_eq!(settings.correction, CorrectionStrategy::ReplaceInserted);
        assert_eq!(settings.layout_path, None);
    }

    #[test]
    fn test_settings_from_toml() {
        let toml = r##"
[keyboard]
target_selector = "#message"
auto_start = false
correction = "strip-all"

[layout]
path = "/etc/thaana/layout.json"
"##;

        let settings = KeyboardSettings::from_toml(toml).unwrap();
        assert_eq!(settings.target_selector, "#message");
        assert!(!settings.auto_start);
        assert_eq!(settings.correction, CorrectionStrategy::StripAll);
        assert_eq!(
            settings.layout_path,
            Some(PathBuf::from("/etc/thaana/layout.json"))
        );
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let settings = KeyboardSettings::from_toml(default_settings_content()).unwrap();
        assert_eq!(settings, KeyboardSettings::default());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let toml = r#"
[keyboard]
correction = "guess"
"#;
        assert!(matches!(
            KeyboardSettings::from_toml(toml),
            Err(SettingsError::TomlParse(_))
        ));
    }

    #[test]
    fn test_relative_layout_path_resolves_next_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = dir.path().join("mini.json");
        std::fs::write(&layout, r#"{ "name": "mini", "entries": { "k": "ކ" } }"#).unwrap();
        let settings_path = dir.path().join("settings.toml");
        std::fs::write(&settings_path, "[layout]\npath = \"mini.json\"\n").unwrap();

        let settings = KeyboardSettings::from_file(&settings_path).unwrap();
        assert_eq!(settings.layout_path, Some(layout));
        let map = settings.load_layout().unwrap();
        assert_eq!(map.name(), "mini");
    }

    #[test]
    fn test_builtin_layout_without_path() {
        let map = KeyboardSettings::default().load_layout().unwrap();
        assert_eq!(map.name(), "thaana-phonetic");
    }
}
