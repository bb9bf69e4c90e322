// Score input model
// The note-and-instrument contract handed over by the MIDI loader

use serde::{Deserialize, Serialize};

/// A raw note as supplied by the source, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawNote {
    /// MIDI pitch (0-127)
    pub pitch: u8,

    /// MIDI velocity (0-127)
    pub velocity: u8,

    /// Onset in seconds
    pub start: f64,

    /// Release in seconds (exclusive)
    pub end: f64,
}

/// One instrument from the source, with its notes in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentTrack {
    /// Display name from source metadata, if any
    pub name: Option<String>,

    /// General MIDI program number, if known
    pub program: Option<u8>,

    /// Notes in source order
    pub notes: Vec<RawNote>,
}

/// The full parsed source: an ordered list of instruments.
///
/// Instrument indices are positions in this list and stay stable for the
/// lifetime of a run; colors, labels, and frame keys all refer to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    pub instruments: Vec<InstrumentTrack>,
}

impl Score {
    /// Total notes across all instruments
    pub fn note_count(&self) -> usize {
        self.instruments.iter().map(|track| track.notes.len()).sum()
    }
}

/// Handle into the note arena.
///
/// Frames and layouts reference notes through these instead of holding
/// copies; one note sounding across twenty frames is stored once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(pub(crate) u32);

impl NoteId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One validated sounding note instance. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch (0-127)
    pub pitch: u8,

    /// MIDI velocity (0-127); carried for consumers, unused by the engine
    pub velocity: u8,

    /// Onset in seconds
    pub start: f64,

    /// Release in seconds (exclusive)
    pub end: f64,

    /// Always recomputed as end - start, never trusted from input
    pub duration: f64,

    /// Index into the instrument list
    pub instrument: usize,

    /// Hex color from the fixed palette, a pure function of `instrument`
    pub color: String,
}

impl NoteEvent {
    /// Half-open containment: a note is active at its start and no longer
    /// active at its end.
    pub fn is_active_at(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Identity of the logical note. Two arena entries describe the same
    /// note event iff all four components match exactly.
    pub fn identity(&self) -> (u8, u64, u64, usize) {
        (
            self.pitch,
            self.start.to_bits(),
            self.end.to_bits(),
            self.instrument,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_containment() {
        let note = NoteEvent {
            pitch: 60,
            velocity: 100,
            start: 1.0,
            end: 2.0,
            duration: 1.0,
            instrument: 0,
            color: "#FF6B6B".to_string(),
        };

        assert!(note.is_active_at(1.0));
        assert!(note.is_active_at(1.5));
        assert!(!note.is_active_at(2.0));
        assert!(!note.is_active_at(0.999));
    }

    #[test]
    fn test_identity_matches_on_all_four_components() {
        let a = NoteEvent {
            pitch: 60,
            velocity: 100,
            start: 0.0,
            end: 1.0,
            duration: 1.0,
            instrument: 0,
            color: "#FF6B6B".to_string(),
        };
        let mut b = a.clone();
        b.velocity = 50;
        // Velocity and color are not part of identity
        assert_eq!(a.identity(), b.identity());

        let mut c = a.clone();
        c.instrument = 1;
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn test_note_count() {
        let score = Score {
            instruments: vec![
                InstrumentTrack {
                    notes: vec![
                        RawNote { pitch: 60, velocity: 100, start: 0.0, end: 1.0 },
                        RawNote { pitch: 64, velocity: 100, start: 0.5, end: 1.5 },
                    ],
                    ..Default::default()
                },
                InstrumentTrack::default(),
            ],
        };

        assert_eq!(score.note_count(), 2);
    }
}
