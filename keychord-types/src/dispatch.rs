//! Dispatch abstraction between input handling and the chord state.

use crate::{ChordAction, DispatchResult};

/// Anything that applies chord actions and reports what changed.
///
/// `ChordKeyboard` implements it by running the reducer and then notifying listeners.
pub trait Dispatcher {
    fn dispatch(&mut self, action: &ChordAction) -> DispatchResult;
}
