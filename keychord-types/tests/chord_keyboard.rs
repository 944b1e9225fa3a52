//! Click-level scenarios driving the widget the way a host would.

use std::cell::RefCell;
use std::rc::Rc;

use keychord_types::{
    chord_label, note_names, ChordAction, ChordEvent, ChordKeyboard, Dispatcher, OctaveShift,
    Slot,
};

fn record_chords(keyboard: &mut ChordKeyboard) -> Rc<RefCell<Vec<[i32; 4]>>> {
    let chords = Rc::new(RefCell::new(Vec::new()));
    let sink = chords.clone();
    keyboard.on_chord_changed(move |snapshot| sink.borrow_mut().push(snapshot.raw()));
    chords
}

#[test]
fn build_edit_and_clear_a_triad() {
    let mut keyboard = ChordKeyboard::new();
    let chords = record_chords(&mut keyboard);
    assert_eq!(keyboard.window().base_note(), 48);

    for offset in [0, 4, 7] {
        keyboard.click_key(offset);
    }
    assert_eq!(keyboard.current_chord().raw(), [48, 52, 55, -1]);
    assert_eq!(chord_label(&keyboard.sorted_notes()).as_deref(), Some("C"));
    assert_eq!(note_names(&keyboard.sorted_notes()), "C3 E3 G3");

    keyboard.click_key(4);
    assert_eq!(keyboard.current_chord().raw(), [48, 55, -1, -1]);

    keyboard.clear();
    assert_eq!(keyboard.current_chord().raw(), [-1, -1, -1, -1]);

    assert_eq!(
        *chords.borrow(),
        vec![
            [48, -1, -1, -1],
            [48, 52, -1, -1],
            [48, 52, 55, -1],
            [48, 55, -1, -1],
            [-1, -1, -1, -1],
        ]
    );
}

#[test]
fn fifth_click_evicts_the_oldest_note() {
    let mut keyboard = ChordKeyboard::new();
    for offset in [0, 2, 4, 5, 7] {
        keyboard.click_key(offset);
    }
    assert_eq!(keyboard.current_chord().raw(), [50, 52, 53, 55]);
}

#[test]
fn chord_survives_octave_shifts() {
    let mut keyboard = ChordKeyboard::new();
    keyboard.click_key(0);
    keyboard.shift_octave(OctaveShift::Up);
    // Same key, one octave up: a different note joins the chord
    keyboard.click_key(0);
    assert_eq!(keyboard.current_chord().raw(), [48, 60, -1, -1]);

    keyboard.shift_octave(OctaveShift::Down);
    // Back in the starting window the first C is still lit and clicking it removes it
    assert!(keyboard.keys()[0].pressed);
    assert!(keyboard.keys()[12].pressed);
    keyboard.click_key(0);
    assert_eq!(keyboard.current_chord().raw(), [60, -1, -1, -1]);
}

#[test]
fn note_toggles_precede_chord_change() {
    let mut keyboard = ChordKeyboard::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    keyboard.subscribe(move |event| {
        let entry = match event {
            ChordEvent::NoteToggled { note, pressed } => format!("{}:{}", note, pressed),
            ChordEvent::ChordChanged(snapshot) => snapshot.to_string(),
            ChordEvent::OctaveChanged(octave) => format!("octave {}", octave),
        };
        sink.borrow_mut().push(entry);
    });

    keyboard.click_key(0);
    keyboard.click_key(0);
    keyboard.shift_octave(OctaveShift::Down);

    assert_eq!(
        *log.borrow(),
        vec![
            "48:true",
            "[48, -1, -1, -1]",
            "48:false",
            "[-1, -1, -1, -1]",
            "octave 2",
        ]
    );
}

#[test]
fn host_slot_assignment_goes_through_dispatch() {
    let mut keyboard = ChordKeyboard::new();
    let chords = record_chords(&mut keyboard);
    let result = keyboard.dispatch(&ChordAction::SetSlots([
        Slot::Occupied(52),
        Slot::Empty,
        Slot::Occupied(48),
        Slot::Empty,
    ]));
    assert_eq!(result.chord().unwrap().raw(), [52, 48, -1, -1]);
    assert_eq!(chords.borrow().len(), 1);
    assert!(keyboard.keys()[0].pressed);
    assert!(keyboard.keys()[4].pressed);
}

#[test]
fn geometry_matches_keys() {
    let mut keyboard = ChordKeyboard::new();
    keyboard.click_key(1);
    let geometry = keyboard.geometry();
    assert_eq!(geometry.len(), 36);
    let cs = geometry.iter().find(|k| k.relative_offset == 1).unwrap();
    assert!(cs.is_black);
    assert!(cs.pressed);
    let w = 100.0 / 21.0;
    assert!((cs.left_percent - w * 0.7).abs() < 1e-4);
}
