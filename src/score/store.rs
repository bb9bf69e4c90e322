// Note interval store
// Validated, flattened view of all notes across all instruments

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::midi::gm;
use crate::palette;
use super::types::{InstrumentTrack, NoteEvent, NoteId, Score};

/// Errors detected at ingestion, before any frame is built.
///
/// A malformed note fails the whole run; silently dropping or "fixing" it
/// would mask upstream parsing bugs with a partially-correct timeline.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("invalid interval on instrument {instrument}, pitch {pitch}: end {end} <= start {start}")]
    InvalidInterval {
        instrument: usize,
        pitch: u8,
        start: f64,
        end: f64,
    },

    #[error("non-finite timestamp on instrument {instrument}, pitch {pitch}")]
    NonFiniteTime { instrument: usize, pitch: u8 },

    #[error("pitch {pitch} exceeds the MIDI range 0-127 on instrument {instrument}")]
    PitchOutOfRange { instrument: usize, pitch: u8 },

    #[error("velocity {velocity} exceeds the MIDI range 0-127 on instrument {instrument}")]
    VelocityOutOfRange { instrument: usize, velocity: u8 },
}

/// The validated note arena plus the instrument display labels.
///
/// Notes are addressed by [`NoteId`]; downstream structures (frames, layout
/// wedges) hold handles, never copies. An empty score is valid and yields an
/// empty store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteStore {
    notes: Vec<NoteEvent>,
    labels: BTreeMap<usize, String>,
    instrument_count: usize,
}

impl NoteStore {
    /// Flatten and validate a score.
    ///
    /// Fails on the first malformed note. Rejects rather than clamps
    /// out-of-range pitch/velocity, and rejects non-finite timestamps so
    /// float ordering is total everywhere downstream.
    pub fn from_score(score: &Score) -> Result<Self, ScoreError> {
        let mut notes = Vec::with_capacity(score.note_count());
        let mut labels = BTreeMap::new();

        for (instrument, track) in score.instruments.iter().enumerate() {
            labels.insert(instrument, instrument_label(instrument, track));
            let color = palette::color_for(instrument);

            for raw in &track.notes {
                if raw.pitch > 127 {
                    return Err(ScoreError::PitchOutOfRange {
                        instrument,
                        pitch: raw.pitch,
                    });
                }
                if raw.velocity > 127 {
                    return Err(ScoreError::VelocityOutOfRange {
                        instrument,
                        velocity: raw.velocity,
                    });
                }
                if !raw.start.is_finite() || !raw.end.is_finite() {
                    return Err(ScoreError::NonFiniteTime {
                        instrument,
                        pitch: raw.pitch,
                    });
                }
                if raw.end <= raw.start {
                    return Err(ScoreError::InvalidInterval {
                        instrument,
                        pitch: raw.pitch,
                        start: raw.start,
                        end: raw.end,
                    });
                }

                notes.push(NoteEvent {
                    pitch: raw.pitch,
                    velocity: raw.velocity,
                    start: raw.start,
                    end: raw.end,
                    duration: raw.end - raw.start,
                    instrument,
                    color: color.to_string(),
                });
            }
        }

        Ok(NoteStore {
            notes,
            labels,
            instrument_count: score.instruments.len(),
        })
    }

    /// All notes in arena order (source order)
    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    /// Resolve a handle
    pub fn get(&self, id: NoteId) -> &NoteEvent {
        &self.notes[id.index()]
    }

    /// All handles in arena order
    pub fn ids(&self) -> impl Iterator<Item = NoteId> {
        (0..self.notes.len() as u32).map(NoteId)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Number of instruments in the source, including note-less ones
    pub fn instrument_count(&self) -> usize {
        self.instrument_count
    }

    /// Display label per instrument index
    pub fn labels(&self) -> &BTreeMap<usize, String> {
        &self.labels
    }
}

/// Display label for an instrument column.
///
/// Source name wins, then a General MIDI program lookup, then the bare
/// index. Formatting-only; the engine never reads labels.
fn instrument_label(index: usize, track: &InstrumentTrack) -> String {
    let mut label = format!("Instrument_{}", index);

    if let Some(name) = track.name.as_deref().map(str::trim).filter(|name| !name.is_empty()) {
        label.push('_');
        label.push_str(name);
    } else if let Some(name) = track.program.and_then(gm::program_name) {
        label.push('_');
        label.push_str(name);
    }

    label
}
