//! # keychord-types
//!
//! Chord state machine and keyboard geometry for the keychord chord-entry widget.
//! Nothing in this crate draws: the host renders from [`KeyGeometry`] records and feeds
//! clicks back as relative semitone offsets.
//!
//! ## Module Overview
//!
//! - [`state`]: `ChordSlots` (4-slot FIFO chord), `OctaveWindow`, `KeyboardLayout`,
//!   note naming helpers
//! - [`action`]: `ChordAction`, `ChordEvent` and `DispatchResult`
//! - [`reduce`]: pure reducers applying actions to `ChordKeyboardState`
//! - [`chord_detect`]: root + quality detection for the chord label
//! - [`widget`]: `ChordKeyboard`, the coordinating widget with listener registration

pub mod action;
pub mod chord_detect;
pub mod dispatch;
pub mod reduce;
pub mod state;
pub mod widget;

pub use action::*;
pub use chord_detect::{chord_label, detect_chord, ChordQuality};
pub use dispatch::Dispatcher;
pub use widget::{ChordKeyboard, ListenerId};

// Re-export all state types at crate root for convenience
pub use state::*;

/// Absolute (MIDI-style) note number or relative semitone offset.
pub type Note = u8;
