use serde::{Deserialize, Serialize};

use crate::Note;

/// Octaves visible at once.
pub const OCTAVE_SPAN: u8 = 3;
pub const MIN_BASE_OCTAVE: u8 = 0;
pub const MAX_BASE_OCTAVE: u8 = 7;
const DEFAULT_BASE_OCTAVE: u8 = 3;

/// Direction of an octave shift button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OctaveShift {
    Down,
    Up,
}

impl OctaveShift {
    pub fn delta(self) -> i8 {
        match self {
            OctaveShift::Down => -1,
            OctaveShift::Up => 1,
        }
    }

    pub fn from_delta(delta: i8) -> Option<Self> {
        match delta {
            -1 => Some(OctaveShift::Down),
            1 => Some(OctaveShift::Up),
            _ => None,
        }
    }
}

/// The three-octave slice of the keyboard currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct OctaveWindow {
    base_octave: u8,
}

impl Default for OctaveWindow {
    fn default() -> Self {
        Self {
            base_octave: DEFAULT_BASE_OCTAVE,
        }
    }
}

impl From<u8> for OctaveWindow {
    fn from(base_octave: u8) -> Self {
        Self::new(base_octave)
    }
}

impl From<OctaveWindow> for u8 {
    fn from(window: OctaveWindow) -> Self {
        window.base_octave
    }
}

impl OctaveWindow {
    /// Out-of-range octaves are clamped into `[MIN_BASE_OCTAVE, MAX_BASE_OCTAVE]`.
    pub fn new(base_octave: u8) -> Self {
        Self {
            base_octave: base_octave.clamp(MIN_BASE_OCTAVE, MAX_BASE_OCTAVE),
        }
    }

    pub fn base_octave(&self) -> u8 {
        self.base_octave
    }

    pub fn span(&self) -> u8 {
        OCTAVE_SPAN
    }

    /// Absolute note of the leftmost key. Octave 3 maps to 48.
    pub fn base_note(&self) -> Note {
        self.base_octave * 12 + 12
    }

    pub fn absolute(&self, relative_offset: u8) -> Note {
        self.base_note() + relative_offset
    }

    /// Relative offset of `note` if it falls inside the window.
    pub fn relative(&self, note: Note) -> Option<u8> {
        note.checked_sub(self.base_note())
            .filter(|offset| *offset < OCTAVE_SPAN * 12)
    }

    /// Move one octave. Returns false when already at the bound (nothing changes).
    pub fn shift(&mut self, direction: OctaveShift) -> bool {
        let target = (self.base_octave as i8 + direction.delta())
            .clamp(MIN_BASE_OCTAVE as i8, MAX_BASE_OCTAVE as i8) as u8;
        if target == self.base_octave {
            return false;
        }
        self.base_octave = target;
        true
    }

    pub fn at_lower_bound(&self) -> bool {
        self.base_octave == MIN_BASE_OCTAVE
    }

    pub fn at_upper_bound(&self) -> bool {
        self.base_octave == MAX_BASE_OCTAVE
    }

    /// Whether the shift control for `direction` should be enabled.
    pub fn can_shift(&self, direction: OctaveShift) -> bool {
        match direction {
            OctaveShift::Down => !self.at_lower_bound(),
            OctaveShift::Up => !self.at_upper_bound(),
        }
    }

    /// Label for the octave indicator, e.g. "C3".
    pub fn label(&self) -> String {
        format!("C{}", self.base_octave)
    }
}
