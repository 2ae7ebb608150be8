//! `#play` music notation
//!
//! A stateful single-pass parser: length prefixes (t s i q h w, `3` for
//! triplets, `.` for dotted), `+`/`-` octave shifts, note letters a..g with
//! optional `#`/`!` accidentals, `x` rests, and digits for percussion.
//! Unrecognized characters are skipped rather than rejected.

/// One event in a play pattern, durations in 32nd-note units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    /// A pitched tone; `pitch` is a semitone index (octave * 12 + note).
    Tone { pitch: u8, len: u8 },
    Rest { len: u8 },
    Drum { id: u8, len: u8 },
}

const BASE_OCTAVE: i16 = 3;

/// Semitone offsets for letters a..g within an octave.
fn letter_semitone(letter: u8) -> i16 {
    match letter {
        b'c' => 0,
        b'd' => 2,
        b'e' => 4,
        b'f' => 5,
        b'g' => 7,
        b'a' => 9,
        _ => 11, // b
    }
}

/// Parse a play pattern into note events.
pub fn parse_play(text: &str) -> Vec<NoteEvent> {
    let mut events = vec![];
    let mut octave: i16 = BASE_OCTAVE;
    let mut length: u8 = 1;

    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i].to_ascii_lowercase();
        i += 1;
        match c {
            b't' => length = 1,
            b's' => length = 2,
            b'i' => length = 4,
            b'q' => length = 8,
            b'h' => length = 16,
            b'w' => length = 32,
            b'3' => length = (length / 3).max(1),
            b'.' => length = length.saturating_add(length / 2),
            b'+' => octave = (octave + 1).min(6),
            b'-' => octave = (octave - 1).max(1),
            b'x' => events.push(NoteEvent::Rest { len: length }),
            b'0'..=b'9' => events.push(NoteEvent::Drum {
                id: c - b'0',
                len: length,
            }),
            b'a'..=b'g' => {
                let mut semitone = octave * 12 + letter_semitone(c);
                // Accidental applies to the note it follows.
                match bytes.get(i) {
                    Some(b'#') => {
                        semitone += 1;
                        i += 1;
                    }
                    Some(b'!') => {
                        semitone -= 1;
                        i += 1;
                    }
                    _ => {}
                }
                events.push(NoteEvent::Tone {
                    pitch: semitone.clamp(0, 127) as u8,
                    len: length,
                });
            }
            _ => {}
        }
    }
    events
}
