//! The coordinating chord keyboard widget.
//!
//! `ChordKeyboard` owns the chord and octave window, turns clicks into reducer actions, and
//! fans the resulting events out to registered listeners before returning. Listeners only
//! see the event, never the widget, so a notification cannot re-enter a dispatch.

use crate::reduce::reduce_action;
use crate::state::{
    ChordKeyboardState, ChordSlots, ChordSnapshot, KeyDescriptor, KeyGeometry, KeyboardLayout,
    OctaveShift, OctaveWindow, Slot, CHORD_CAPACITY,
};
use crate::{ChordAction, ChordEvent, DispatchResult, Dispatcher, Note};

/// Handle returned by the `on_*`/`subscribe` registrations, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ChordEvent)>;

pub struct ChordKeyboard {
    state: ChordKeyboardState,
    layout: KeyboardLayout,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for ChordKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChordKeyboard {
    pub fn new() -> Self {
        Self::with_state(ChordKeyboardState::new())
    }

    pub fn with_base_octave(base_octave: u8) -> Self {
        Self::with_state(ChordKeyboardState::with_base_octave(base_octave))
    }

    pub fn with_state(state: ChordKeyboardState) -> Self {
        Self {
            layout: KeyboardLayout::new(state.window.span()),
            state,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────

    pub fn state(&self) -> &ChordKeyboardState {
        &self.state
    }

    pub fn chord(&self) -> &ChordSlots {
        &self.state.chord
    }

    pub fn current_chord(&self) -> ChordSnapshot {
        self.state.chord.snapshot()
    }

    /// Held notes, lowest first.
    pub fn sorted_notes(&self) -> Vec<Note> {
        self.state.chord.sorted()
    }

    pub fn window(&self) -> &OctaveWindow {
        &self.state.window
    }

    pub fn base_octave(&self) -> u8 {
        self.state.window.base_octave()
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Whether the shift control for `direction` should be enabled.
    pub fn can_shift(&self, direction: OctaveShift) -> bool {
        self.state.window.can_shift(direction)
    }

    pub fn keys(&self) -> Vec<KeyDescriptor> {
        self.layout.keys(|offset| self.state.is_pressed(offset))
    }

    /// Render records in paint order (white keys first).
    pub fn geometry(&self) -> Vec<KeyGeometry> {
        self.layout.geometry(|offset| self.state.is_pressed(offset))
    }

    // ── Listeners ─────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&ChordEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn on_chord_changed(
        &mut self,
        mut listener: impl FnMut(&ChordSnapshot) + 'static,
    ) -> ListenerId {
        self.subscribe(move |event| {
            if let ChordEvent::ChordChanged(snapshot) = event {
                listener(snapshot);
            }
        })
    }

    pub fn on_octave_changed(&mut self, mut listener: impl FnMut(u8) + 'static) -> ListenerId {
        self.subscribe(move |event| {
            if let ChordEvent::OctaveChanged(octave) = event {
                listener(*octave);
            }
        })
    }

    pub fn on_note_toggled(
        &mut self,
        mut listener: impl FnMut(Note, bool) + 'static,
    ) -> ListenerId {
        self.subscribe(move |event| {
            if let ChordEvent::NoteToggled { note, pressed } = event {
                listener(*note, *pressed);
            }
        })
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // ── Operations ────────────────────────────────────────────────

    pub fn click_key(&mut self, relative_offset: u8) -> DispatchResult {
        self.dispatch(&ChordAction::ClickKey(relative_offset))
    }

    pub fn shift_octave(&mut self, direction: OctaveShift) -> DispatchResult {
        self.dispatch(&ChordAction::ShiftOctave(direction))
    }

    pub fn clear(&mut self) -> DispatchResult {
        self.dispatch(&ChordAction::Clear)
    }

    pub fn set_slots(&mut self, slots: [Slot; CHORD_CAPACITY]) -> DispatchResult {
        self.dispatch(&ChordAction::SetSlots(slots))
    }

    fn notify(&mut self, result: &DispatchResult) {
        for event in &result.events {
            for (_, listener) in self.listeners.iter_mut() {
                listener(event);
            }
        }
    }
}

impl Dispatcher for ChordKeyboard {
    fn dispatch(&mut self, action: &ChordAction) -> DispatchResult {
        log::debug!(target: "widget", "dispatch {:?}", action);
        let result = reduce_action(action, &mut self.state);
        if let Some(chord) = result.chord() {
            log::debug!(target: "widget", "chord changed: {}", chord);
        }
        self.notify(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn listeners_receive_events_in_order() {
        let mut keyboard = ChordKeyboard::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        keyboard.subscribe(move |event| sink.borrow_mut().push(*event));

        keyboard.click_key(0);
        let events = seen.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ChordEvent::NoteToggled { note: 48, pressed: true });
        assert!(matches!(events[1], ChordEvent::ChordChanged(_)));
    }

    #[test]
    fn typed_listeners_filter_events() {
        let mut keyboard = ChordKeyboard::new();
        let octaves = Rc::new(RefCell::new(Vec::new()));
        let chords = Rc::new(RefCell::new(0));

        let o = octaves.clone();
        keyboard.on_octave_changed(move |octave| o.borrow_mut().push(octave));
        let c = chords.clone();
        keyboard.on_chord_changed(move |_| *c.borrow_mut() += 1);

        keyboard.shift_octave(OctaveShift::Up);
        keyboard.shift_octave(OctaveShift::Up);
        keyboard.click_key(3);

        assert_eq!(*octaves.borrow(), vec![4, 5]);
        assert_eq!(*chords.borrow(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut keyboard = ChordKeyboard::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = keyboard.on_note_toggled(move |_, _| *c.borrow_mut() += 1);

        keyboard.click_key(0);
        assert!(keyboard.unsubscribe(id));
        assert!(!keyboard.unsubscribe(id));
        keyboard.click_key(0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn pressed_keys_follow_the_window() {
        let mut keyboard = ChordKeyboard::new();
        keyboard.click_key(12);
        assert!(keyboard.keys()[12].pressed);

        keyboard.shift_octave(OctaveShift::Up);
        let keys = keyboard.keys();
        assert!(keys[0].pressed);
        assert!(!keys[12].pressed);
        assert_eq!(keyboard.sorted_notes(), vec![60]);
    }

    #[test]
    fn shift_controls_disable_at_bounds() {
        let mut keyboard = ChordKeyboard::with_base_octave(6);
        assert!(keyboard.can_shift(OctaveShift::Up));
        keyboard.shift_octave(OctaveShift::Up);
        assert!(!keyboard.can_shift(OctaveShift::Up));
        assert!(keyboard.shift_octave(OctaveShift::Up).is_empty());
        assert_eq!(keyboard.base_octave(), 7);
    }

    #[test]
    fn dispatches_through_trait_object() {
        let mut keyboard = ChordKeyboard::new();
        let notified = Rc::new(RefCell::new(0));
        let count = notified.clone();
        keyboard.on_chord_changed(move |_| *count.borrow_mut() += 1);

        let dispatcher: &mut dyn Dispatcher = &mut keyboard;
        let result = dispatcher.dispatch(&ChordAction::ClickKey(4));
        assert_eq!(result.chord().map(|c| c.raw()), Some([52, -1, -1, -1]));
        assert_eq!(*notified.borrow(), 1);
    }
}
