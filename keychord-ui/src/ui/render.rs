use ratatui::buffer::Buffer;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

pub use ratatui::layout::Rect;

use super::style::Style;

/// Wraps a ratatui `Buffer` and accepts our `Style`/`Color` types natively.
pub struct RenderBuf<'a> {
    buf: &'a mut Buffer,
}

impl<'a> RenderBuf<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    /// Set a single character at (x, y) with the given style.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(ch)
                .set_style(ratatui::style::Style::from(style));
        }
    }

    /// Draw a string at (x, y) without wrapping. Characters beyond the buffer
    /// boundary are silently clipped.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.set_cell(x.saturating_add(i as u16), y, ch, style);
        }
    }

    /// Draw `text` horizontally centered in `area` on its first row.
    pub fn draw_centered(&mut self, area: Rect, text: &str, style: Style) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let len = text.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(len) / 2;
        self.draw_str(x, area.y, text, style);
    }

    /// Paint `height` cells downward from (x, y), one key column.
    pub fn fill_column(&mut self, x: u16, y: u16, height: u16, ch: char, style: Style) {
        for dy in 0..height {
            self.set_cell(x, y.saturating_add(dy), ch, style);
        }
    }

    /// Draw a bordered block with a title. Returns the inner `Rect`.
    pub fn draw_block(
        &mut self,
        area: Rect,
        title: &str,
        border_style: Style,
        title_style: Style,
    ) -> Rect {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(ratatui::style::Style::from(border_style))
            .title_style(ratatui::style::Style::from(title_style));
        let inner = block.inner(area);
        block.render(area, self.buf);
        inner
    }

    /// Draw styled spans on a single line within the given area.
    pub fn draw_line(&mut self, area: Rect, spans: &[(&str, Style)]) {
        let rat_spans: Vec<Span> = spans
            .iter()
            .map(|(text, style)| Span::styled(*text, ratatui::style::Style::from(*style)))
            .collect();
        Paragraph::new(Line::from(rat_spans)).render(area, self.buf);
    }
}
