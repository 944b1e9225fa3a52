//! Chord recognition from the held notes, for the chord label.

use crate::state::music::pitch_class_name;
use crate::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Major7,
    Minor7,
    Sus2,
    Sus4,
    Power,
    Unison,
    Unknown,
}

impl ChordQuality {
    /// Suffix appended to the root in a chord symbol ("m" for C minor -> "Cm").
    pub fn symbol(&self) -> &'static str {
        match self {
            ChordQuality::Major | ChordQuality::Unison => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Power => "5",
            ChordQuality::Unknown => "?",
        }
    }
}

// (quality, intervals above the root, priority). Higher priority wins when several match.
const CHORD_TEMPLATES: [(ChordQuality, &[u8], u8); 10] = [
    (ChordQuality::Dominant7, &[0, 4, 7, 10], 12),
    (ChordQuality::Major7, &[0, 4, 7, 11], 12),
    (ChordQuality::Minor7, &[0, 3, 7, 10], 12),
    (ChordQuality::Major, &[0, 4, 7], 10),
    (ChordQuality::Minor, &[0, 3, 7], 10),
    (ChordQuality::Sus4, &[0, 5, 7], 8),
    (ChordQuality::Sus2, &[0, 2, 7], 8),
    (ChordQuality::Diminished, &[0, 3, 6], 7),
    (ChordQuality::Augmented, &[0, 4, 8], 7),
    (ChordQuality::Power, &[0, 7], 5),
];

/// Root pitch class (0-11) and quality of the held notes.
/// A single pitch class is `Unison`; nothing held is `None`.
pub fn detect_chord(notes: &[Note]) -> Option<(u8, ChordQuality)> {
    let mut present = [false; 12];
    for note in notes {
        present[(note % 12) as usize] = true;
    }
    let pitch_classes: Vec<u8> = (0..12u8).filter(|pc| present[*pc as usize]).collect();

    match pitch_classes.len() {
        0 => return None,
        1 => return Some((pitch_classes[0], ChordQuality::Unison)),
        _ => {}
    }

    let mut best: Option<(u8, ChordQuality, u8)> = None;
    for &root in &pitch_classes {
        let has = |interval: u8| present[((root + interval) % 12) as usize];
        for &(quality, template, priority) in &CHORD_TEMPLATES {
            let beats_best = best.map_or(true, |(_, _, p)| priority > p);
            if beats_best && template.iter().all(|i| has(*i)) {
                best = Some((root, quality, priority));
            }
        }
    }

    match best {
        Some((root, quality, _)) => Some((root, quality)),
        None => notes.iter().min().map(|low| (low % 12, ChordQuality::Unknown)),
    }
}

/// Chord symbol such as "C", "Am" or "G7". `None` unless two or more pitch classes are held.
pub fn chord_label(notes: &[Note]) -> Option<String> {
    match detect_chord(notes)? {
        (_, ChordQuality::Unison) => None,
        (root, quality) => Some(format!("{}{}", pitch_class_name(root), quality.symbol())),
    }
}
