use crate::state::{ChordSlots, Slot, Toggle, CHORD_CAPACITY};
use crate::{ChordEvent, ChordKeyboardState, DispatchResult};

pub(super) fn click_key(offset: u8, state: &mut ChordKeyboardState) -> DispatchResult {
    if offset >= state.window.span() * 12 {
        log::warn!(target: "reduce", "ignoring click on key {} outside the keyboard", offset);
        return DispatchResult::none();
    }

    let note = state.window.absolute(offset);
    let mut result = DispatchResult::none();
    match state.chord.toggle(note) {
        Toggle::Removed => {
            result.push(ChordEvent::NoteToggled { note, pressed: false });
        }
        Toggle::Added { evicted } => {
            if let Some(old) = evicted {
                result.push(ChordEvent::NoteToggled { note: old, pressed: false });
            }
            result.push(ChordEvent::NoteToggled { note, pressed: true });
        }
    }
    result.push(ChordEvent::ChordChanged(state.chord.snapshot()));
    result
}

pub(super) fn clear(state: &mut ChordKeyboardState) -> DispatchResult {
    state.chord.clear();
    let mut result = DispatchResult::none();
    result.push(ChordEvent::ChordChanged(state.chord.snapshot()));
    result
}

pub(super) fn set_slots(
    slots: &[Slot; CHORD_CAPACITY],
    state: &mut ChordKeyboardState,
) -> DispatchResult {
    state.chord = ChordSlots::from_slots(*slots);
    let mut result = DispatchResult::none();
    result.push(ChordEvent::ChordChanged(state.chord.snapshot()));
    result
}
