//! Keyboard shortcut customization support
//!
//! Allows users to customize keyboard shortcuts through configuration.
//! Only the file and application commands are configurable; cursor movement
//! and text editing keys are fixed.

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions that can be bound to keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    // File
    NewFile,
    OpenFile,
    SaveFile,
    SaveAsFile,
    ExportPdf,

    // View
    OpenHelp,

    // System
    Quit,
}

impl KeyAction {
    /// Returns all available actions
    pub fn all() -> Vec<KeyAction> {
        vec![
            KeyAction::NewFile,
            KeyAction::OpenFile,
            KeyAction::SaveFile,
            KeyAction::SaveAsFile,
            KeyAction::ExportPdf,
            KeyAction::OpenHelp,
            KeyAction::Quit,
        ]
    }

    /// Short description for the help overlay
    pub fn description(&self) -> &'static str {
        match self {
            KeyAction::NewFile => "New document",
            KeyAction::OpenFile => "Open document",
            KeyAction::SaveFile => "Save",
            KeyAction::SaveAsFile => "Save as",
            KeyAction::ExportPdf => "Export to PDF",
            KeyAction::OpenHelp => "Show this help",
            KeyAction::Quit => "Quit",
        }
    }
}

/// A key binding specification (serializable format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBindingSpec {
    /// Single key (e.g., "Ctrl+s", "F1")
    Single(String),
    /// Multiple keys (e.g., ["Ctrl+Shift+s", "F12"])
    Multiple(Vec<String>),
}

impl Default for KeyBindingSpec {
    fn default() -> Self {
        KeyBindingSpec::Single(String::new())
    }
}

impl KeyBindingSpec {
    pub fn keys(&self) -> Vec<String> {
        match self {
            KeyBindingSpec::Single(s) => vec![s.clone()],
            KeyBindingSpec::Multiple(v) => v.clone(),
        }
    }
}

/// Parsed key combination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Parse a key string like "Ctrl+s", "Ctrl+Shift+s", "F12", "a"
    pub fn parse(s: &str) -> Option<KeyCombo> {
        let s = s.trim();
        let mut modifiers = KeyModifiers::empty();
        let mut key_part = s;

        let parts: Vec<&str> = s.split('+').collect();
        if parts.len() > 1 {
            for part in &parts[..parts.len() - 1] {
                match part.to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return None, // Unknown modifier
                }
            }
            key_part = parts.last()?;
        }

        let code = parse_key_code(key_part)?;

        Some(KeyCombo::new(code, modifiers))
    }
}

/// Parse a key code string
fn parse_key_code(s: &str) -> Option<KeyCode> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeyCode::Enter),
        "space" => return Some(KeyCode::Char(' ')),
        "tab" => return Some(KeyCode::Tab),
        "backspace" => return Some(KeyCode::Backspace),
        "esc" | "escape" => return Some(KeyCode::Esc),
        "delete" | "del" => return Some(KeyCode::Delete),
        "insert" | "ins" => return Some(KeyCode::Insert),
        other => {
            if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Some(KeyCode::F(n));
                }
            }
        }
    }

    // Single character
    let mut chars = s.chars();
    let first = chars.next()?;
    if chars.next().is_none() {
        return Some(KeyCode::Char(first));
    }

    None
}

/// Keybindings configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    #[serde(flatten)]
    pub bindings: HashMap<KeyAction, KeyBindingSpec>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(KeyAction::NewFile, KeyBindingSpec::Single("Ctrl+n".into()));
        bindings.insert(KeyAction::OpenFile, KeyBindingSpec::Single("Ctrl+o".into()));
        bindings.insert(KeyAction::SaveFile, KeyBindingSpec::Single("Ctrl+s".into()));
        bindings.insert(
            KeyAction::SaveAsFile,
            KeyBindingSpec::Multiple(vec!["Ctrl+Shift+s".into(), "F12".into()]),
        );
        bindings.insert(KeyAction::ExportPdf, KeyBindingSpec::Single("Ctrl+e".into()));
        bindings.insert(KeyAction::OpenHelp, KeyBindingSpec::Single("F1".into()));
        bindings.insert(KeyAction::Quit, KeyBindingSpec::Single("Ctrl+q".into()));

        Self { bindings }
    }
}

/// Runtime keybinding resolver
#[derive(Debug, Clone)]
pub struct KeybindingResolver {
    /// Maps key combinations to actions
    action_map: HashMap<KeyCombo, KeyAction>,
    /// Display strings per action, for the help overlay
    labels: HashMap<KeyAction, Vec<String>>,
}

impl KeybindingResolver {
    /// Create a new resolver from configuration
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let mut action_map = HashMap::new();
        let mut labels: HashMap<KeyAction, Vec<String>> = HashMap::new();

        for (action, spec) in &config.bindings {
            for key_str in spec.keys() {
                match KeyCombo::parse(&key_str) {
                    Some(combo) => {
                        let (code, modifiers) = normalize_key_event(combo.code, combo.modifiers);
                        action_map.insert(KeyCombo::new(code, modifiers), *action);
                        labels.entry(*action).or_default().push(key_str.clone());
                    }
                    None => tracing::warn!("Ignoring unparsable key binding '{}' for {:?}", key_str, action),
                }
            }
        }

        Self { action_map, labels }
    }

    /// Resolve a key event to an action
    pub fn resolve(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
        let (code, modifiers) = normalize_key_event(code, modifiers);

        let combo = KeyCombo::new(code, modifiers);
        self.action_map.get(&combo).copied()
    }

    /// Configured key strings for an action, e.g. `["Ctrl+s"]`
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        self.labels.get(&action).cloned().unwrap_or_default()
    }
}

/// Normalize key events to handle shifted characters consistently.
/// Terminals may or may not include SHIFT in modifiers for characters
/// that are inherently shifted (e.g., '?', 'S'), and may report Ctrl+Shift+s
/// as either 's' or 'S'. Letters with SHIFT become uppercase without SHIFT.
fn normalize_key_event(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Char(c) if c.is_ascii_lowercase() && modifiers.contains(KeyModifiers::SHIFT) => (
            KeyCode::Char(c.to_ascii_uppercase()),
            modifiers - KeyModifiers::SHIFT,
        ),
        KeyCode::Char(c) if !c.is_ascii_lowercase() => (code, modifiers - KeyModifiers::SHIFT),
        _ => (code, modifiers),
    }
}

impl Default for KeybindingResolver {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_char() {
        let combo = KeyCombo::parse("j").unwrap();
        assert_eq!(combo.code, KeyCode::Char('j'));
        assert!(combo.modifiers.is_empty());
    }

    #[test]
    fn test_parse_ctrl_shift_key() {
        let combo = KeyCombo::parse("Ctrl+Shift+s").unwrap();
        assert_eq!(combo.code, KeyCode::Char('s'));
        assert!(combo.modifiers.contains(KeyModifiers::CONTROL));
        assert!(combo.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(KeyCombo::parse("Enter").unwrap().code, KeyCode::Enter);
        assert_eq!(KeyCombo::parse("Space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(KeyCombo::parse("Escape").unwrap().code, KeyCode::Esc);
        assert_eq!(KeyCombo::parse("F1").unwrap().code, KeyCode::F(1));
        assert_eq!(KeyCombo::parse("f12").unwrap().code, KeyCode::F(12));
        assert!(KeyCombo::parse("F13").is_none());
        assert!(KeyCombo::parse("Hyper+s").is_none());
    }

    #[test]
    fn test_default_keybindings() {
        let resolver = KeybindingResolver::default();

        assert_eq!(
            resolver.resolve(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(KeyAction::SaveFile)
        );
        assert_eq!(
            resolver.resolve(KeyCode::Char('o'), KeyModifiers::CONTROL),
            Some(KeyAction::OpenFile)
        );
        assert_eq!(
            resolver.resolve(KeyCode::Char('e'), KeyModifiers::CONTROL),
            Some(KeyAction::ExportPdf)
        );
        assert_eq!(
            resolver.resolve(KeyCode::F(1), KeyModifiers::empty()),
            Some(KeyAction::OpenHelp)
        );
        assert_eq!(resolver.resolve(KeyCode::Char('s'), KeyModifiers::empty()), None);
    }

    #[test]
    fn test_save_as_shift_variants() {
        let resolver = KeybindingResolver::default();

        // Terminals report Ctrl+Shift+s in different ways
        for (code, modifiers) in [
            (KeyCode::Char('S'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            (KeyCode::Char('S'), KeyModifiers::CONTROL),
            (KeyCode::Char('s'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
        ] {
            assert_eq!(resolver.resolve(code, modifiers), Some(KeyAction::SaveAsFile));
        }
        assert_eq!(
            resolver.resolve(KeyCode::F(12), KeyModifiers::empty()),
            Some(KeyAction::SaveAsFile)
        );
    }

    #[test]
    fn test_custom_bindings_from_toml() {
        let config: KeybindingsConfig = toml::from_str(
            r#"
save_file = ["Ctrl+w", "F2"]
quit = "Esc"
"#,
        )
        .unwrap();
        let resolver = KeybindingResolver::from_config(&config);

        assert_eq!(
            resolver.resolve(KeyCode::Char('w'), KeyModifiers::CONTROL),
            Some(KeyAction::SaveFile)
        );
        assert_eq!(
            resolver.resolve(KeyCode::F(2), KeyModifiers::empty()),
            Some(KeyAction::SaveFile)
        );
        assert_eq!(
            resolver.resolve(KeyCode::Esc, KeyModifiers::empty()),
            Some(KeyAction::Quit)
        );
        assert_eq!(resolver.keys_for(KeyAction::SaveFile), vec!["Ctrl+w", "F2"]);
    }

    #[test]
    fn test_every_action_has_default_binding() {
        let config = KeybindingsConfig::default();
        for action in KeyAction::all() {
            assert!(config.bindings.contains_key(&action), "{:?} unbound", action);
        }
    }
}
