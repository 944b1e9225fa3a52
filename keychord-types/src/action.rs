use serde::{Deserialize, Serialize};

use crate::state::{ChordSnapshot, OctaveShift, Slot, CHORD_CAPACITY};
use crate::Note;

/// Input to the chord keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordAction {
    /// A key was clicked; the payload is its offset from the leftmost visible key.
    ClickKey(u8),
    ShiftOctave(OctaveShift),
    Clear,
    /// Host assignment of all four slots (normalized before it is stored).
    SetSlots([Slot; CHORD_CAPACITY]),
}

/// Notification emitted after a state change, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordEvent {
    /// A single note entered (`pressed`) or left the chord.
    NoteToggled { note: Note, pressed: bool },
    ChordChanged(ChordSnapshot),
    OctaveChanged(u8),
}

/// Result of dispatching one action: the events to fan out, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub events: Vec<ChordEvent>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ChordEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The chord snapshot carried by this result, if the chord was touched.
    pub fn chord(&self) -> Option<ChordSnapshot> {
        self.events.iter().rev().find_map(|e| match e {
            ChordEvent::ChordChanged(snapshot) => Some(*snapshot),
            _ => None,
        })
    }
}
