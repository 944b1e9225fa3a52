use std::time::Duration;

/// Mouse button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Presses select keys and buttons; the wheel steps the octave window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    ScrollUp,
    ScrollDown,
}

/// Mouse event with terminal cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
}

impl MouseEvent {
    pub fn left_click(column: u16, row: u16) -> Self {
        Self {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
        }
    }
}

/// Top-level input event: keyboard, mouse, or resize
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    Key(InputEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// The keys a chord keyboard binding can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
}

/// Modifier key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

impl InputEvent {
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers, is_repeat: false }
    }

    pub fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::default())
    }
}

/// Trait for reading input events
pub trait InputSource {
    /// Poll for an input event with a timeout.
    /// Returns None if no event is available within the timeout.
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}
