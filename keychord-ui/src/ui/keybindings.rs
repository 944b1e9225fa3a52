use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{InputEvent, KeyCode};

/// Raw TOML structure for the keybindings file
#[derive(Deserialize)]
struct KeybindingConfig {
    #[allow(dead_code)]
    version: u32,
    bindings: Vec<RawBinding>,
}

/// A single binding entry from TOML
#[derive(Deserialize)]
struct RawBinding {
    key: String,
    action: String,
    description: String,
}

/// Key patterns a binding can match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPattern {
    Char(char),
    Key(KeyCode),
    Ctrl(char),
}

impl KeyPattern {
    /// The key in the notation the keybindings file uses.
    pub fn label(&self) -> String {
        match *self {
            KeyPattern::Char(' ') => "Space".to_string(),
            KeyPattern::Char(c) => c.to_string(),
            KeyPattern::Key(code) => match code {
                KeyCode::Char(c) => c.to_string(),
                KeyCode::Escape => "Escape".to_string(),
                KeyCode::Backspace => "Backspace".to_string(),
                KeyCode::Up => "Up".to_string(),
                KeyCode::Down => "Down".to_string(),
                KeyCode::Left => "Left".to_string(),
                KeyCode::Right => "Right".to_string(),
            },
            KeyPattern::Ctrl(c) => format!("Ctrl+{}", c),
        }
    }

    fn matches(&self, event: &InputEvent) -> bool {
        match *self {
            KeyPattern::Char(c) => {
                event.key == KeyCode::Char(c) && !event.modifiers.ctrl && !event.modifiers.alt
            }
            KeyPattern::Key(code) => event.key == code && !event.modifiers.ctrl,
            KeyPattern::Ctrl(c) => event.key == KeyCode::Char(c) && event.modifiers.ctrl,
        }
    }
}

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    ShiftDown,
    ShiftUp,
    Clear,
    Quit,
    /// Toggle the key this many semitones above the leftmost visible C
    Play(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub pattern: KeyPattern,
    pub action: ActionId,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn from_bindings(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    pub fn lookup(&self, event: &InputEvent) -> Option<ActionId> {
        self.bindings
            .iter()
            .find(|b| b.pattern.matches(event))
            .map(|b| b.action)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// The binding `lookup` would pick first for `action`.
    pub fn first_binding(&self, action: ActionId) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.action == action)
    }

    /// Play keys ordered by the offset they toggle, e.g. "awsedftgyhujk".
    pub fn play_keys(&self) -> String {
        let mut play: Vec<(u8, String)> = self
            .bindings
            .iter()
            .filter_map(|b| match b.action {
                ActionId::Play(offset) => Some((offset, b.pattern.label())),
                _ => None,
            })
            .collect();
        play.sort_by_key(|(offset, _)| *offset);
        let separator = if play.iter().all(|(_, label)| label.chars().count() == 1) { "" } else { " " };
        play.into_iter()
            .map(|(_, label)| label)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Parse a key notation string into a KeyPattern.
///
/// Supported formats: `"q"`, `"Space"`, `"Left"`, `"Ctrl+c"`. Named keys are the arrows,
/// `Escape` and `Backspace`.
/// Returns `None` for unrecognised key names (e.g. from a malformed user config).
fn parse_key(s: &str) -> Option<KeyPattern> {
    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeyPattern::Ctrl(c)),
            _ => None,
        };
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeyPattern::Char(c)),
        _ if s == "Space" => Some(KeyPattern::Char(' ')),
        _ => parse_named_key(s).map(KeyPattern::Key),
    }
}

fn parse_named_key(s: &str) -> Option<KeyCode> {
    match s {
        "Up" => Some(KeyCode::Up),
        "Down" => Some(KeyCode::Down),
        "Left" => Some(KeyCode::Left),
        "Right" => Some(KeyCode::Right),
        "Escape" => Some(KeyCode::Escape),
        "Backspace" => Some(KeyCode::Backspace),
        _ => None,
    }
}

fn parse_action_id(s: &str) -> Option<ActionId> {
    match s {
        "shift_down" => Some(ActionId::ShiftDown),
        "shift_up" => Some(ActionId::ShiftUp),
        "clear" => Some(ActionId::Clear),
        "quit" => Some(ActionId::Quit),
        _ => s
            .strip_prefix("play_")
            .and_then(|offset| offset.parse::<u8>().ok())
            .map(ActionId::Play),
    }
}

/// Embedded default keybindings TOML
const DEFAULT_KEYBINDINGS: &str = include_str!("../../keybindings.toml");

/// Load keybindings: embedded default, optionally merged with the user file.
pub fn load_keybindings() -> Keymap {
    load_keybindings_from(user_keybindings_path().as_deref())
}

pub fn load_keybindings_from(user_path: Option<&Path>) -> Keymap {
    let mut config: KeybindingConfig =
        toml::from_str(DEFAULT_KEYBINDINGS).expect("Failed to parse embedded keybindings.toml");

    if let Some(path) = user_path.filter(|p| p.exists()) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<KeybindingConfig>(&contents) {
                Ok(user_config) => merge_config(&mut config, user_config),
                Err(e) => {
                    log::warn!(target: "ui::keybindings", "ignoring malformed keybindings {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "ui::keybindings", "could not read keybindings {}: {}", path.display(), e)
            }
        }
    }

    Keymap::from_bindings(build_bindings(&config.bindings))
}

fn user_keybindings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keychord").join("keybindings.toml"))
}

/// User bindings replace default bindings for the same key and are consulted first.
fn merge_config(base: &mut KeybindingConfig, user: KeybindingConfig) {
    base.bindings
        .retain(|b| !user.bindings.iter().any(|u| u.key == b.key));
    let mut merged = user.bindings;
    merged.append(&mut base.bindings);
    base.bindings = merged;
}

fn build_bindings(raw: &[RawBinding]) -> Vec<KeyBinding> {
    raw.iter()
        .filter_map(|b| {
            let Some(pattern) = parse_key(&b.key) else {
                log::warn!(target: "ui::keybindings", "ignoring unknown key '{}' in keybindings", b.key);
                return None;
            };
            let Some(action) = parse_action_id(&b.action) else {
                log::warn!(target: "ui::keybindings", "ignoring unknown action '{}'", b.action);
                return None;
            };
            Some(KeyBinding {
                pattern,
                action,
                description: b.description.clone(),
            })
        })
        .collect()
}
