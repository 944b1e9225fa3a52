use crate::state::OctaveShift;
use crate::{ChordEvent, ChordKeyboardState, DispatchResult};

/// Chord membership is absolute, so shifting only moves the window: which keys light up
/// changes, the held notes do not.
pub(super) fn shift(direction: OctaveShift, state: &mut ChordKeyboardState) -> DispatchResult {
    let mut result = DispatchResult::none();
    if state.window.shift(direction) {
        result.push(ChordEvent::OctaveChanged(state.window.base_octave()));
    }
    result
}
