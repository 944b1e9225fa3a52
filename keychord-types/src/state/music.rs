use crate::Note;

/// Sharp spellings of the twelve pitch classes, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub fn pitch_class_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES[(pitch_class % 12) as usize]
}

/// Note name with octave, e.g. 48 -> "C3", 60 -> "C4".
pub fn note_name(note: Note) -> String {
    let octave = (note / 12) as i8 - 1;
    format!("{}{}", pitch_class_name(note), octave)
}

/// Space-separated names, e.g. "C3 E3 G3".
pub fn note_names(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| note_name(*n))
        .collect::<Vec<_>>()
        .join(" ")
}
