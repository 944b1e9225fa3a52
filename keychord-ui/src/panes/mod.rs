mod chord_keyboard_pane;

pub use chord_keyboard_pane::{ChordKeyboardPane, PaneAction};
