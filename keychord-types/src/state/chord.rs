use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Note;

/// Number of notes a chord can hold at once.
pub const CHORD_CAPACITY: usize = 4;

/// One chord position: a held note or nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(Note),
}

impl Slot {
    pub fn note(self) -> Option<Note> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(note) => Some(note),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Sentinel form for hosts that expect plain integers: `-1` marks an empty slot.
    pub fn raw(self) -> i32 {
        self.note().map_or(-1, i32::from)
    }
}

impl From<Option<Note>> for Slot {
    fn from(note: Option<Note>) -> Self {
        note.map_or(Slot::Empty, Slot::Occupied)
    }
}

/// What a toggle did to the chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The note entered the chord. `evicted` is the oldest note if the chord was full.
    Added { evicted: Option<Note> },
    Removed,
}

/// Fixed-capacity, insertion-ordered chord.
///
/// Occupied slots are always packed at the front (oldest first) and no note appears twice.
/// When all four slots are taken, adding a note evicts the oldest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[Slot; CHORD_CAPACITY]", into = "[Slot; CHORD_CAPACITY]")]
pub struct ChordSlots {
    slots: [Slot; CHORD_CAPACITY],
}

impl ChordSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chord by adding `notes` in order. Repeats are skipped and a fifth distinct
    /// note evicts the oldest, exactly as clicking them one by one would.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut chord = Self::new();
        for note in notes {
            chord.add(note);
        }
        chord
    }

    /// Normalize an arbitrary slot assignment: gaps are closed and later duplicates dropped,
    /// keeping the slot order of what remains.
    pub fn from_slots(slots: [Slot; CHORD_CAPACITY]) -> Self {
        Self::from_notes(slots.iter().filter_map(|s| s.note()))
    }

    pub fn slots(&self) -> &[Slot; CHORD_CAPACITY] {
        &self.slots
    }

    /// Held notes in insertion order, oldest first.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.slots.iter().filter_map(|s| s.note())
    }

    /// Held notes in ascending pitch order (for display).
    pub fn sorted(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self.notes().collect();
        notes.sort_unstable();
        notes
    }

    pub fn len(&self) -> usize {
        self.notes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_empty()
    }

    pub fn is_full(&self) -> bool {
        !self.slots[CHORD_CAPACITY - 1].is_empty()
    }

    pub fn is_active(&self, note: Note) -> bool {
        self.slots.contains(&Slot::Occupied(note))
    }

    /// Add a note to the first free slot, or evict the oldest when full.
    /// Returns false (and changes nothing) if the note is already held.
    pub fn add(&mut self, note: Note) -> bool {
        if self.is_active(note) {
            return false;
        }
        match self.slots.iter_mut().find(|s| s.is_empty()) {
            Some(slot) => *slot = Slot::Occupied(note),
            None => {
                self.slots.rotate_left(1);
                self.slots[CHORD_CAPACITY - 1] = Slot::Occupied(note);
            }
        }
        true
    }

    /// Remove a note and close the gap. Returns false if the note was not held.
    pub fn remove(&mut self, note: Note) -> bool {
        let Some(index) = self.slots.iter().position(|s| *s == Slot::Occupied(note)) else {
            return false;
        };
        self.slots[index] = Slot::Empty;
        self.compact();
        true
    }

    /// Click semantics: remove if held, add otherwise.
    pub fn toggle(&mut self, note: Note) -> Toggle {
        if self.remove(note) {
            return Toggle::Removed;
        }
        let evicted = if self.is_full() { self.slots[0].note() } else { None };
        self.add(note);
        Toggle::Added { evicted }
    }

    pub fn clear(&mut self) {
        self.slots = [Slot::Empty; CHORD_CAPACITY];
    }

    pub fn snapshot(&self) -> ChordSnapshot {
        ChordSnapshot(self.slots)
    }

    fn compact(&mut self) {
        let mut packed = [Slot::Empty; CHORD_CAPACITY];
        for (dst, note) in packed.iter_mut().zip(self.notes()) {
            *dst = Slot::Occupied(note);
        }
        self.slots = packed;
    }
}

impl From<[Slot; CHORD_CAPACITY]> for ChordSlots {
    fn from(slots: [Slot; CHORD_CAPACITY]) -> Self {
        Self::from_slots(slots)
    }
}

impl From<ChordSlots> for [Slot; CHORD_CAPACITY] {
    fn from(chord: ChordSlots) -> Self {
        chord.slots
    }
}

/// Read-only copy of the four slots, empties included, as sent with chord notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordSnapshot(pub [Slot; CHORD_CAPACITY]);

impl ChordSnapshot {
    pub fn slots(&self) -> &[Slot; CHORD_CAPACITY] {
        &self.0
    }

    /// Slots as integers with `-1` for empty.
    pub fn raw(&self) -> [i32; CHORD_CAPACITY] {
        self.0.map(Slot::raw)
    }

    pub fn notes(&self) -> Vec<Note> {
        self.0.iter().filter_map(|s| s.note()).collect()
    }

    pub fn sorted(&self) -> Vec<Note> {
        let mut notes = self.notes();
        notes.sort_unstable();
        notes
    }

    pub fn len(&self) -> usize {
        self.0.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ChordSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.raw();
        write!(f, "[{}, {}, {}, {}]", a, b, c, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(chord: &ChordSlots) {
        let slots = chord.slots();
        for i in 0..CHORD_CAPACITY - 1 {
            assert!(
                !(slots[i].is_empty() && !slots[i + 1].is_empty()),
                "gap before occupied slot in {:?}",
                slots
            );
        }
        let notes: Vec<Note> = chord.notes().collect();
        for (i, a) in notes.iter().enumerate() {
            for b in &notes[i + 1..] {
                assert_ne!(a, b, "duplicate note in {:?}", slots);
            }
        }
    }

    #[test]
    fn deserialize_normalizes_slots() {
        let json = r#"["Empty",{"Occupied":60},{"Occupied":60},"Empty"]"#;
        let mut chord: ChordSlots = serde_json::from_str(json).unwrap();
        assert_eq!(chord.snapshot().raw(), [60, -1, -1, -1]);
        assert!(!chord.is_empty());
        assert_eq!(chord.len(), 1);
        assert_invariants(&chord);

        chord.add(64);
        assert_eq!(chord.snapshot().raw(), [60, 64, -1, -1]);
    }

    #[test]
    fn serialize_roundtrips_as_slot_array() {
        let chord = ChordSlots::from_notes([48, 52, 55]);
        let json = serde_json::to_string(&chord).unwrap();
        assert_eq!(json, r#"[{"Occupied":48},{"Occupied":52},{"Occupied":55},"Empty"]"#);
        assert_eq!(serde_json::from_str::<ChordSlots>(&json).unwrap(), chord);
    }

    #[test]
    fn new_chord_is_empty() {
        let chord = ChordSlots::new();
        assert!(chord.is_empty());
        assert_eq!(chord.snapshot().raw(), [-1, -1, -1, -1]);
    }

    #[test]
    fn add_fills_first_free_slot() {
        let mut chord = ChordSlots::new();
        assert!(chord.add(60));
        assert!(chord.add(64));
        assert_eq!(chord.snapshot().raw(), [60, 64, -1, -1]);
        assert!(chord.is_active(64));
        assert!(!chord.is_active(67));
    }

    #[test]
    fn fifth_note_evicts_oldest() {
        let chord = ChordSlots::from_notes([1, 2, 3, 4, 5]);
        assert_eq!(chord.snapshot().raw(), [2, 3, 4, 5]);
    }

    #[test]
    fn eviction_only_when_full() {
        let mut chord = ChordSlots::from_notes([1, 2, 3]);
        chord.add(4);
        assert_eq!(chord.snapshot().raw(), [1, 2, 3, 4]);
        assert!(chord.is_full());
    }

    #[test]
    fn add_of_held_note_is_noop() {
        let mut chord = ChordSlots::from_notes([60, 64]);
        assert!(!chord.add(60));
        assert_eq!(chord.snapshot().raw(), [60, 64, -1, -1]);
    }

    #[test]
    fn remove_compacts_preserving_order() {
        let mut chord = ChordSlots::from_notes([10, 20, 30, 40]);
        assert!(chord.remove(20));
        assert_eq!(chord.snapshot().raw(), [10, 30, 40, -1]);
        assert!(chord.remove(10));
        assert_eq!(chord.snapshot().raw(), [30, 40, -1, -1]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut chord = ChordSlots::from_notes([10, 20]);
        assert!(!chord.remove(99));
        assert_eq!(chord.snapshot().raw(), [10, 20, -1, -1]);
    }

    #[test]
    fn add_then_remove_restores_state() {
        let before = ChordSlots::from_notes([3, 1, 2]);
        let mut chord = before;
        chord.add(7);
        chord.remove(7);
        assert_eq!(chord, before);
    }

    #[test]
    fn toggle_reports_eviction() {
        let mut chord = ChordSlots::from_notes([1, 2, 3, 4]);
        assert_eq!(chord.toggle(9), Toggle::Added { evicted: Some(1) });
        assert_eq!(chord.toggle(3), Toggle::Removed);
        assert_eq!(chord.toggle(5), Toggle::Added { evicted: None });
        assert_eq!(chord.snapshot().raw(), [2, 4, 9, 5]);
    }

    #[test]
    fn from_slots_normalizes_gaps_and_duplicates() {
        let chord = ChordSlots::from_slots([
            Slot::Empty,
            Slot::Occupied(50),
            Slot::Occupied(40),
            Slot::Occupied(50),
        ]);
        assert_eq!(chord.snapshot().raw(), [50, 40, -1, -1]);
    }

    #[test]
    fn sorted_orders_by_pitch() {
        let chord = ChordSlots::from_notes([67, 60, 64]);
        assert_eq!(chord.sorted(), vec![60, 64, 67]);
        assert_eq!(chord.notes().collect::<Vec<_>>(), vec![67, 60, 64]);
    }

    #[test]
    fn invariants_hold_over_long_toggle_sequence() {
        let mut chord = ChordSlots::new();
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let note = ((seed >> 16) % 8) as Note;
            chord.toggle(note);
            assert_invariants(&chord);
            assert!(chord.len() <= CHORD_CAPACITY);
        }
    }

    #[test]
    fn snapshot_display_uses_sentinels() {
        let chord = ChordSlots::from_notes([48, 55]);
        assert_eq!(chord.snapshot().to_string(), "[48, 55, -1, -1]");
    }
}
