pub mod chord;
pub mod keyboard;
pub mod music;
pub mod octave;

pub use chord::{ChordSlots, ChordSnapshot, Slot, Toggle, CHORD_CAPACITY};
pub use keyboard::{
    KeyDescriptor, KeyGeometry, KeyPlacement, KeyboardLayout, BLACK_KEY_HEIGHT_PERCENT,
    BLACK_KEY_LEFT_RATIO, BLACK_KEY_PATTERN, BLACK_KEY_WIDTH_RATIO, MAX_LAYOUT_SPAN,
};
pub use music::{note_name, note_names, pitch_class_name, NOTE_NAMES};
pub use octave::{OctaveShift, OctaveWindow, MAX_BASE_OCTAVE, MIN_BASE_OCTAVE, OCTAVE_SPAN};

use serde::{Deserialize, Serialize};

/// Everything a chord keyboard widget owns: the selected chord and the visible window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordKeyboardState {
    pub chord: ChordSlots,
    pub window: OctaveWindow,
}

impl ChordKeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_octave(base_octave: u8) -> Self {
        Self {
            chord: ChordSlots::new(),
            window: OctaveWindow::new(base_octave),
        }
    }

    /// Whether the key at `relative_offset` sounds a note of the current chord.
    pub fn is_pressed(&self, relative_offset: u8) -> bool {
        self.chord.is_active(self.window.absolute(relative_offset))
    }
}
