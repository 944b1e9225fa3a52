use std::path::{Path, PathBuf};

use serde::Deserialize;

use keychord_types::{MAX_BASE_OCTAVE, MIN_BASE_OCTAVE};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const DEFAULT_BASE_OCTAVE: u8 = 3;
const DEFAULT_KEY_HEIGHT: u16 = 8;
const MIN_KEY_HEIGHT: u16 = 4;
const MAX_KEY_HEIGHT: u16 = 24;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    base_octave: Option<u8>,
}

#[derive(Deserialize, Default)]
struct DisplayConfig {
    chord_name: Option<bool>,
    key_height: Option<u16>,
}

pub struct Config {
    defaults: DefaultsConfig,
    display: DisplayConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    pub fn load_from(user_path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_defaults(&mut base.defaults, user.defaults);
                            merge_display(&mut base.display, user.display);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
            display: base.display,
        }
    }

    /// Starting octave of the visible window, clamped to the valid range.
    pub fn base_octave(&self) -> u8 {
        self.defaults
            .base_octave
            .unwrap_or(DEFAULT_BASE_OCTAVE)
            .clamp(MIN_BASE_OCTAVE, MAX_BASE_OCTAVE)
    }

    pub fn show_chord_name(&self) -> bool {
        self.display.chord_name.unwrap_or(true)
    }

    /// Keyboard height in rows (clamped to 4..=24).
    pub fn key_height(&self) -> u16 {
        self.display
            .key_height
            .unwrap_or(DEFAULT_KEY_HEIGHT)
            .clamp(MIN_KEY_HEIGHT, MAX_KEY_HEIGHT)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keychord").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.base_octave.is_some() {
        base.base_octave = user.base_octave;
    }
}

fn merge_display(base: &mut DisplayConfig, user: DisplayConfig) {
    if user.chord_name.is_some() {
        base.chord_name = user.chord_name;
    }
    if user.key_height.is_some() {
        base.key_height = user.key_height;
    }
}
