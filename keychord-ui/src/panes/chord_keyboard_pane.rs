use std::cell::RefCell;
use std::rc::Rc;

use keychord_types::{
    chord_label, note_name, note_names, ChordKeyboard, KeyGeometry, OctaveShift,
    BLACK_KEY_HEIGHT_PERCENT,
};

use crate::config::Config;
use crate::ui::{
    ActionId, Color, InputEvent, Keymap, MouseButton, MouseEvent, MouseEventKind, Rect,
    RenderBuf, StatusBar, StatusLevel, Style,
};

const BUTTON_WIDTH: u16 = 5;

/// What the main loop should do after the pane handled an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneAction {
    None,
    Quit,
}

/// Screen regions inside the pane border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub shift_down: Rect,
    pub octave_label: Rect,
    pub shift_up: Rect,
    pub keyboard: Rect,
    pub chord_line: Rect,
    pub status_line: Rect,
    pub help_line: Rect,
}

/// Split the pane interior: a header row with the shift buttons, the keyboard,
/// then one row each for the chord, the status message and the key help.
pub fn regions(inner: Rect, key_height: u16) -> Regions {
    let button = BUTTON_WIDTH.min(inner.width);
    let header_y = inner.y;
    let keyboard_height = key_height.min(inner.height.saturating_sub(4));
    let keyboard = Rect::new(inner.x, header_y + 1, inner.width, keyboard_height);
    let below = keyboard.y + keyboard.height;
    let row = |y: u16| Rect::new(inner.x, y, inner.width, 1).intersection(inner);

    Regions {
        shift_down: Rect::new(inner.x, header_y, button, 1).intersection(inner),
        octave_label: Rect::new(
            inner.x + button,
            header_y,
            inner.width.saturating_sub(button * 2),
            1,
        )
        .intersection(inner),
        shift_up: Rect::new(inner.right().saturating_sub(button), header_y, button, 1)
            .intersection(inner),
        keyboard: keyboard.intersection(inner),
        chord_line: row(below),
        status_line: row(below + 1),
        help_line: row(below + 2),
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Percent coordinate of a cell's center along an axis of `len` cells.
fn cell_percent(index: u16, len: u16) -> f32 {
    (index as f32 + 0.5) * 100.0 / len.max(1) as f32
}

fn key_spans(key: &KeyGeometry, x_percent: f32) -> bool {
    x_percent >= key.left_percent && x_percent < key.left_percent + key.width_percent
}

fn key_style(key: &KeyGeometry) -> Style {
    let bg = match (key.is_black, key.pressed) {
        (false, false) => Color::IVORY_KEY,
        (false, true) => Color::WHITE_KEY_PRESSED,
        (true, false) => Color::EBONY_KEY,
        (true, true) => Color::BLACK_KEY_PRESSED,
    };
    Style::new().fg(Color::KEY_SEPARATOR).bg(bg)
}

/// Three-octave chord entry keyboard with octave shift buttons.
pub struct ChordKeyboardPane {
    keyboard: ChordKeyboard,
    keymap: Keymap,
    status: Rc<RefCell<StatusBar>>,
    show_chord_name: bool,
    key_height: u16,
}

impl ChordKeyboardPane {
    pub fn new(config: &Config, keymap: Keymap) -> Self {
        let mut keyboard = ChordKeyboard::with_base_octave(config.base_octave());
        let status = Rc::new(RefCell::new(StatusBar::new()));

        let sink = status.clone();
        keyboard.on_note_toggled(move |note, pressed| {
            let verb = if pressed { "pressed" } else { "released" };
            log::info!(target: "ui::chord_keyboard", "{} {}", note_name(note), verb);
            sink.borrow_mut()
                .push(format!("{} {}", note_name(note), verb), StatusLevel::Info);
        });
        let sink = status.clone();
        keyboard.on_octave_changed(move |octave| {
            log::info!(target: "ui::chord_keyboard", "octave changed to C{}", octave);
            sink.borrow_mut()
                .push(format!("Octave C{}", octave), StatusLevel::Info);
        });

        Self {
            keyboard,
            keymap,
            status,
            show_chord_name: config.show_chord_name(),
            key_height: config.key_height(),
        }
    }

    pub fn keyboard(&self) -> &ChordKeyboard {
        &self.keyboard
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn inner(area: Rect) -> Rect {
        Rect::new(
            area.x.saturating_add(1),
            area.y.saturating_add(1),
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        )
    }

    fn shift(&mut self, direction: OctaveShift) {
        if !self.keyboard.can_shift(direction) {
            let msg = match direction {
                OctaveShift::Down => "Already at the lowest octave",
                OctaveShift::Up => "Already at the highest octave",
            };
            self.status.borrow_mut().push(msg, StatusLevel::Warning);
        }
        self.keyboard.shift_octave(direction);
    }

    pub fn handle_key(&mut self, event: &InputEvent) -> PaneAction {
        match self.keymap.lookup(event) {
            Some(action) => self.handle_action(action, event),
            None => PaneAction::None,
        }
    }

    pub fn handle_action(&mut self, action: ActionId, event: &InputEvent) -> PaneAction {
        if event.is_repeat && !matches!(action, ActionId::Quit) {
            return PaneAction::None;
        }
        match action {
            ActionId::ShiftDown => self.shift(OctaveShift::Down),
            ActionId::ShiftUp => self.shift(OctaveShift::Up),
            ActionId::Clear => {
                self.keyboard.clear();
                self.status.borrow_mut().push("Chord cleared", StatusLevel::Info);
            }
            ActionId::Play(offset) => {
                self.keyboard.click_key(offset);
            }
            ActionId::Quit => return PaneAction::Quit,
        }
        PaneAction::None
    }

    /// Area is the full terminal area (same as render receives).
    pub fn handle_mouse(&mut self, event: &MouseEvent, area: Rect) -> PaneAction {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {}
            MouseEventKind::ScrollUp => {
                self.shift(OctaveShift::Up);
                return PaneAction::None;
            }
            MouseEventKind::ScrollDown => {
                self.shift(OctaveShift::Down);
                return PaneAction::None;
            }
            MouseEventKind::Down(_) => return PaneAction::None,
        }
        let regions = regions(Self::inner(area), self.key_height);
        let (column, row) = (event.column, event.row);

        if contains(regions.shift_down, column, row) {
            self.shift(OctaveShift::Down);
        } else if contains(regions.shift_up, column, row) {
            self.shift(OctaveShift::Up);
        } else if contains(regions.keyboard, column, row) {
            let kb = regions.keyboard;
            let x = cell_percent(column - kb.x, kb.width);
            let y = cell_percent(row - kb.y, kb.height);
            if let Some(offset) = self.keyboard.layout().key_at(x, y) {
                self.keyboard.click_key(offset);
            }
        }
        PaneAction::None
    }

    pub fn render(&mut self, area: Rect, buf: &mut RenderBuf) {
        let border = Style::new().fg(Color::SKY_BLUE);
        let inner = buf.draw_block(
            area,
            " Chord Keyboard ",
            border,
            Style::new().fg(Color::WHITE).bold(),
        );
        let regions = regions(inner, self.key_height);

        self.render_header(&regions, buf);
        self.render_keys(regions.keyboard, buf);
        self.render_chord_line(regions.chord_line, buf);

        if let Some(msg) = self.status.borrow().current() {
            let color = match msg.level {
                StatusLevel::Info => Color::WHITE,
                StatusLevel::Warning => Color::GOLD,
            };
            buf.draw_line(regions.status_line, &[(msg.text.as_str(), Style::new().fg(color))]);
        }

        let help = self.help_spans();
        let spans: Vec<(&str, Style)> = help.iter().map(|(t, style)| (t.as_str(), *style)).collect();
        buf.draw_line(regions.help_line, &spans);
    }

    /// Key help built from the loaded keymap, so user remaps show up here.
    fn help_spans(&self) -> Vec<(String, Style)> {
        let key_style = Style::new().fg(Color::GRAY);
        let text_style = Style::new().fg(Color::DARK_GRAY);
        let mut spans = Vec::new();

        let play = self.keymap.play_keys();
        if !play.is_empty() {
            spans.push((play, key_style));
            spans.push((": play  ".to_string(), text_style));
        }
        for action in [ActionId::ShiftDown, ActionId::ShiftUp, ActionId::Clear, ActionId::Quit] {
            if let Some(binding) = self.keymap.first_binding(action) {
                spans.push((binding.pattern.label(), key_style));
                spans.push((format!(": {}  ", binding.description), text_style));
            }
        }
        spans
    }

    fn render_header(&self, regions: &Regions, buf: &mut RenderBuf) {
        let enabled = Style::new().fg(Color::SKY_BLUE).bold();
        let disabled = Style::new().fg(Color::DARK_GRAY);

        let down = if self.keyboard.can_shift(OctaveShift::Down) { enabled } else { disabled };
        let up = if self.keyboard.can_shift(OctaveShift::Up) { enabled } else { disabled };
        buf.draw_str(regions.shift_down.x, regions.shift_down.y, "[ < ]", down);
        buf.draw_str(regions.shift_up.x, regions.shift_up.y, "[ > ]", up);

        let window = self.keyboard.window();
        let label = format!("{} - B{}", window.label(), window.base_octave() + window.span() - 1);
        buf.draw_centered(regions.octave_label, &label, Style::new().fg(Color::WHITE));
    }

    /// Paint in geometry order so black keys land on top of the white keys they cover.
    fn render_keys(&self, kb: Rect, buf: &mut RenderBuf) {
        if kb.width == 0 || kb.height == 0 {
            return;
        }
        let window = *self.keyboard.window();
        // Rows whose center lies in the black key band, matching the hit test.
        let black_rows = (0..kb.height)
            .take_while(|dy| cell_percent(*dy, kb.height) < BLACK_KEY_HEIGHT_PERCENT)
            .count() as u16;

        for key in self.keyboard.geometry() {
            let style = key_style(&key);
            let rows = if key.is_black { black_rows } else { kb.height };
            let columns = (0..kb.width).filter(|dx| key_spans(&key, cell_percent(*dx, kb.width)));
            for (i, dx) in columns.enumerate() {
                let ch = if !key.is_black && i == 0 && key.relative_offset > 0 { '▏' } else { ' ' };
                buf.fill_column(kb.x + dx, kb.y, rows, ch, style);
            }

            if !key.is_black && key.relative_offset % 12 == 0 {
                let left = (key.left_percent * kb.width as f32 / 100.0).ceil() as u16;
                let name = note_name(window.absolute(key.relative_offset));
                let label_style = style.fg(Color::BLACK);
                buf.draw_str(kb.x + left + 1, kb.bottom() - 1, &name, label_style);
            }
        }
    }

    fn render_chord_line(&self, area: Rect, buf: &mut RenderBuf) {
        let snapshot = self.keyboard.current_chord();
        let sorted = snapshot.sorted();
        let label = if self.show_chord_name {
            chord_label(&sorted).unwrap_or_default()
        } else {
            String::new()
        };
        let names = note_names(&sorted);
        let slots = snapshot.to_string();

        let key_style = Style::new().fg(Color::GRAY);
        buf.draw_line(
            area,
            &[
                ("Chord: ", key_style),
                (label.as_str(), Style::new().fg(Color::GOLD).bold()),
                ("  ", key_style),
                (names.as_str(), Style::new().fg(Color::WHITE)),
                ("  ", key_style),
                (slots.as_str(), Style::new().fg(Color::DARK_GRAY)),
            ],
        );
    }
}
