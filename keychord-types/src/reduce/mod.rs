//! Pure state-mutation reducers for the chord keyboard.
//!
//! These functions are the only place `ChordKeyboardState` changes. They return the events
//! describing the change and never call listeners themselves; fan-out is the widget's job.

mod chord;
mod octave;

use crate::{ChordAction, ChordKeyboardState, DispatchResult};

/// Apply one action. Returns the resulting events (empty when nothing changed).
pub fn reduce_action(action: &ChordAction, state: &mut ChordKeyboardState) -> DispatchResult {
    match action {
        ChordAction::ClickKey(offset) => chord::click_key(*offset, state),
        ChordAction::Clear => chord::clear(state),
        ChordAction::SetSlots(slots) => chord::set_slots(slots, state),
        ChordAction::ShiftOctave(direction) => octave::shift(*direction, state),
    }
}
