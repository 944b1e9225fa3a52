//! Piano key geometry in percent of the keyboard's width and height.
//!
//! White keys are equal cells laid edge to edge; each black key straddles the right part of
//! the white key before it. White key ordinals run continuously across the whole visible
//! span, so octave boundaries line up like any other white key pair.

use serde::{Deserialize, Serialize};

use super::octave::OCTAVE_SPAN;

/// Key coloring of one octave starting at C (true = black key).
pub const BLACK_KEY_PATTERN: [bool; 12] = [
    false, true, false, true, false, false, true, false, true, false, true, false,
];

/// Black key left edge, in white-key widths past the start of the white key it sits above.
pub const BLACK_KEY_LEFT_RATIO: f32 = 0.7;
/// Black key width as a fraction of a white key.
pub const BLACK_KEY_WIDTH_RATIO: f32 = 0.6;
/// Black keys cover the top 60% of the keyboard.
pub const BLACK_KEY_HEIGHT_PERCENT: f32 = 60.0;

/// Whether the key `relative_offset` semitones above a C is black.
pub fn is_black(relative_offset: u8) -> bool {
    BLACK_KEY_PATTERN[(relative_offset % 12) as usize]
}

fn white_keys_per_octave() -> u8 {
    BLACK_KEY_PATTERN.iter().filter(|black| !**black).count() as u8
}

/// Horizontal extent of a key, in percent of the keyboard width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyPlacement {
    pub left_percent: f32,
    pub width_percent: f32,
}

impl KeyPlacement {
    pub fn right_percent(&self) -> f32 {
        self.left_percent + self.width_percent
    }

    pub fn contains(&self, x_percent: f32) -> bool {
        x_percent >= self.left_percent && x_percent < self.right_percent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub relative_offset: u8,
    pub is_black: bool,
    pub pressed: bool,
}

/// Everything the rendering layer needs to draw and hit-test one key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyGeometry {
    pub relative_offset: u8,
    pub is_black: bool,
    pub pressed: bool,
    pub left_percent: f32,
    pub width_percent: f32,
}

/// Widest layout whose key offsets still fit in a `u8` (21 * 12 = 252 keys).
pub const MAX_LAYOUT_SPAN: u8 = 21;

/// Stateless key layout for a keyboard `octave_span` octaves wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct KeyboardLayout {
    octave_span: u8,
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::new(OCTAVE_SPAN)
    }
}

impl From<u8> for KeyboardLayout {
    fn from(octave_span: u8) -> Self {
        Self::new(octave_span)
    }
}

impl From<KeyboardLayout> for u8 {
    fn from(layout: KeyboardLayout) -> Self {
        layout.octave_span
    }
}

impl KeyboardLayout {
    /// Spans are clamped into `1..=MAX_LAYOUT_SPAN`.
    pub fn new(octave_span: u8) -> Self {
        Self {
            octave_span: octave_span.clamp(1, MAX_LAYOUT_SPAN),
        }
    }

    pub fn octave_span(&self) -> u8 {
        self.octave_span
    }

    pub fn key_count(&self) -> u8 {
        self.octave_span * 12
    }

    pub fn classify_key(&self, relative_offset: u8) -> bool {
        is_black(relative_offset)
    }

    pub fn white_key_count(&self) -> u8 {
        self.octave_span * white_keys_per_octave()
    }

    /// Width of one white key in percent.
    pub fn white_key_width(&self) -> f32 {
        100.0 / self.white_key_count() as f32
    }

    /// Ordinal of the white key at (or, for a black key, just below) `relative_offset`,
    /// counted from the first key of the span.
    pub fn white_key_index(&self, relative_offset: u8) -> u8 {
        let before = (0..relative_offset).filter(|o| !is_black(*o)).count() as u8;
        if is_black(relative_offset) {
            before.saturating_sub(1)
        } else {
            before
        }
    }

    /// Placement of a black key. White keys have none: they fill equal cells.
    pub fn place(&self, relative_offset: u8) -> Option<KeyPlacement> {
        if !is_black(relative_offset) {
            return None;
        }
        let width = self.white_key_width();
        let index = self.white_key_index(relative_offset) as f32;
        Some(KeyPlacement {
            left_percent: width * (index + BLACK_KEY_LEFT_RATIO),
            width_percent: width * BLACK_KEY_WIDTH_RATIO,
        })
    }

    /// The cell a white key occupies in the background layer.
    pub fn white_cell(&self, relative_offset: u8) -> Option<KeyPlacement> {
        if is_black(relative_offset) {
            return None;
        }
        let width = self.white_key_width();
        Some(KeyPlacement {
            left_percent: width * self.white_key_index(relative_offset) as f32,
            width_percent: width,
        })
    }

    pub fn placement(&self, relative_offset: u8) -> KeyPlacement {
        self.place(relative_offset)
            .or_else(|| self.white_cell(relative_offset))
            .unwrap_or(KeyPlacement {
                left_percent: 0.0,
                width_percent: 0.0,
            })
    }

    /// All keys in semitone order.
    pub fn keys(&self, pressed: impl Fn(u8) -> bool) -> Vec<KeyDescriptor> {
        (0..self.key_count())
            .map(|offset| KeyDescriptor {
                relative_offset: offset,
                is_black: is_black(offset),
                pressed: pressed(offset),
            })
            .collect()
    }

    /// Offsets in paint order: every white key, then every black key.
    pub fn render_order(&self) -> Vec<u8> {
        let (white, black): (Vec<u8>, Vec<u8>) =
            (0..self.key_count()).partition(|offset| !is_black(*offset));
        white.into_iter().chain(black).collect()
    }

    /// Render records in paint order.
    pub fn geometry(&self, pressed: impl Fn(u8) -> bool) -> Vec<KeyGeometry> {
        self.render_order()
            .into_iter()
            .map(|offset| {
                let placement = self.placement(offset);
                KeyGeometry {
                    relative_offset: offset,
                    is_black: is_black(offset),
                    pressed: pressed(offset),
                    left_percent: placement.left_percent,
                    width_percent: placement.width_percent,
                }
            })
            .collect()
    }

    /// Key under a point given in percent of the keyboard size (y grows downward).
    /// Black keys win over the white key they cover.
    pub fn key_at(&self, x_percent: f32, y_percent: f32) -> Option<u8> {
        if !(0.0..100.0).contains(&x_percent) || !(0.0..100.0).contains(&y_percent) {
            return None;
        }
        if y_percent < BLACK_KEY_HEIGHT_PERCENT {
            let black = (0..self.key_count())
                .filter(|offset| is_black(*offset))
                .find(|offset| self.place(*offset).is_some_and(|p| p.contains(x_percent)));
            if black.is_some() {
                return black;
            }
        }
        let white_index = (x_percent / self.white_key_width()) as u8;
        (0..self.key_count())
            .filter(|offset| !is_black(*offset))
            .nth(white_index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn classify_follows_pattern() {
        let layout = KeyboardLayout::default();
        let black: Vec<u8> = (0..12).filter(|o| layout.classify_key(*o)).collect();
        assert_eq!(black, vec![1, 3, 6, 8, 10]);
        assert!(layout.classify_key(13));
        assert!(!layout.classify_key(24));
    }

    #[test]
    fn span_is_clamped_to_fit_offsets() {
        let widest = KeyboardLayout::new(u8::MAX);
        assert_eq!(widest.octave_span(), MAX_LAYOUT_SPAN);
        assert_eq!(widest.key_count(), 252);
        assert_eq!(widest.white_key_count(), 147);
        assert_eq!(widest.geometry(|_| false).len(), 252);
        assert_eq!(widest.key_at(99.9, 99.0), Some(251));
        assert_eq!(KeyboardLayout::new(22), widest);
        assert_eq!(KeyboardLayout::new(0).octave_span(), 1);

        let decoded: KeyboardLayout = serde_json::from_str("40").unwrap();
        assert_eq!(decoded, widest);
    }

    #[test]
    fn three_octaves_have_21_white_keys() {
        let layout = KeyboardLayout::default();
        assert_eq!(layout.key_count(), 36);
        assert_eq!(layout.white_key_count(), 21);
        assert_eq!(KeyboardLayout::new(1).white_key_count(), 7);
    }

    #[test]
    fn white_key_index_continues_across_octaves() {
        let layout = KeyboardLayout::default();
        assert_eq!(layout.white_key_index(0), 0);
        assert_eq!(layout.white_key_index(4), 2);
        assert_eq!(layout.white_key_index(5), 3);
        assert_eq!(layout.white_key_index(11), 6);
        assert_eq!(layout.white_key_index(12), 7);
        assert_eq!(layout.white_key_index(35), 20);
    }

    #[test]
    fn black_key_index_is_white_key_below() {
        let layout = KeyboardLayout::default();
        assert_eq!(layout.white_key_index(1), 0);
        assert_eq!(layout.white_key_index(3), 1);
        assert_eq!(layout.white_key_index(6), 3);
        assert_eq!(layout.white_key_index(10), 5);
        assert_eq!(layout.white_key_index(13), 7);
    }

    #[test]
    fn black_key_placement_uses_ratios() {
        let layout = KeyboardLayout::default();
        let w = 100.0 / 21.0;
        let cs = layout.place(1).unwrap();
        assert!(approx(cs.left_percent, w * 0.7));
        assert!(approx(cs.width_percent, w * 0.6));

        let cs2 = layout.place(13).unwrap();
        assert!(approx(cs2.left_percent - cs.left_percent, w * 7.0));
        assert!(layout.place(0).is_none());
    }

    #[test]
    fn white_cells_tile_the_width() {
        let layout = KeyboardLayout::default();
        let last = layout.white_cell(35).unwrap();
        assert!(approx(last.right_percent(), 100.0));
        assert!(approx(layout.white_cell(12).unwrap().left_percent, 700.0 / 21.0));
    }

    #[test]
    fn render_order_puts_white_keys_first() {
        let layout = KeyboardLayout::default();
        let order = layout.render_order();
        assert_eq!(order.len(), 36);
        let first_black = order.iter().position(|o| is_black(*o)).unwrap();
        assert_eq!(first_black, 21);
        assert!(order[first_black..].iter().all(|o| is_black(*o)));
    }

    #[test]
    fn geometry_carries_pressed_flags() {
        let layout = KeyboardLayout::default();
        let geometry = layout.geometry(|o| o == 4 || o == 6);
        let pressed: Vec<u8> = geometry
            .iter()
            .filter(|k| k.pressed)
            .map(|k| k.relative_offset)
            .collect();
        assert_eq!(pressed, vec![4, 6]);
    }

    #[test]
    fn key_at_prefers_black_keys_in_upper_region() {
        let layout = KeyboardLayout::default();
        let w = 100.0 / 21.0;
        // Right part of the first white key, covered by C#
        assert_eq!(layout.key_at(w * 0.9, 10.0), Some(1));
        // Same column below the black keys hits C
        assert_eq!(layout.key_at(w * 0.9, 80.0), Some(0));
        // Between E and F there is no black key
        assert_eq!(layout.key_at(w * 2.9, 10.0), Some(4));
        assert_eq!(layout.key_at(w * 7.2, 90.0), Some(12));
        assert_eq!(layout.key_at(100.0, 10.0), None);
    }
}
