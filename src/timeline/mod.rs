// Timeline extraction engine
// One event-driven timeline, shared by every downstream consumer

mod change_points;
mod frames;

pub use change_points::collect_change_points;
pub use frames::TimelineFrame;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::palette;
use crate::score::{NoteEvent, NoteId, NoteStore, Score, ScoreError};

/// The full ordered sequence of frames for one input, plus the aggregates
/// consumers use to size their layouts.
///
/// Owns the note arena; frames hold [`NoteId`] handles into it. Read-only
/// after extraction — both the tabular exporter and the playback side render
/// from this one structure instead of re-deriving active notes themselves.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    store: NoteStore,
    frames: Vec<TimelineFrame>,
    max_concurrent_notes: usize,
    instrument_colors: BTreeMap<usize, String>,
}

impl Timeline {
    /// Validate, flatten, and extract in one step.
    ///
    /// Zero notes is not an error: the result is an empty timeline with
    /// `max_concurrent_notes == 0`, which consumers treat as "nothing to
    /// render".
    pub fn extract(score: &Score) -> Result<Self, ScoreError> {
        Ok(Self::from_store(NoteStore::from_score(score)?))
    }

    /// Extract from an already-validated store.
    pub fn from_store(store: NoteStore) -> Self {
        let frames = frames::build_frames(&store);
        let max_concurrent_notes = frames
            .iter()
            .map(TimelineFrame::active_count)
            .max()
            .unwrap_or(0);
        let instrument_colors = (0..store.instrument_count())
            .map(|instrument| (instrument, palette::color_for(instrument).to_string()))
            .collect();

        log::info!(
            "Extracted timeline: {} frames from {} notes, max {} concurrent",
            frames.len(),
            store.len(),
            max_concurrent_notes
        );

        Timeline {
            store,
            frames,
            max_concurrent_notes,
            instrument_colors,
        }
    }

    /// All frames, strictly increasing by time
    pub fn frames(&self) -> &[TimelineFrame] {
        &self.frames
    }

    /// True when the input had no notes
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolve a note handle against the arena
    pub fn note(&self, id: NoteId) -> &NoteEvent {
        self.store.get(id)
    }

    /// Peak total active-note count over all frames, 0 when empty. Sizes
    /// discrete angular/positional slots downstream.
    pub fn max_concurrent_notes(&self) -> usize {
        self.max_concurrent_notes
    }

    /// Hex color per instrument index, for every source instrument
    pub fn instrument_colors(&self) -> &BTreeMap<usize, String> {
        &self.instrument_colors
    }

    /// Display label per instrument index
    pub fn instrument_names(&self) -> &BTreeMap<usize, String> {
        self.store.labels()
    }

    /// Number of instruments in the source
    pub fn instrument_count(&self) -> usize {
        self.store.instrument_count()
    }

    /// The frame governing instant `t`: the last change point at or before
    /// it. None before the first change point and on an empty timeline.
    pub fn frame_at(&self, t: f64) -> Option<&TimelineFrame> {
        let idx = self.frames.partition_point(|frame| frame.time <= t);
        idx.checked_sub(1).map(|i| &self.frames[i])
    }

    /// Final change point, 0.0 when empty
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|frame| frame.time).unwrap_or(0.0)
    }

    /// Each logical note exactly once, ordered by (start, instrument).
    ///
    /// Frames repeat a note for as long as it sounds; persistent per-note
    /// state (visuals, voices) is keyed by the `(pitch, start, end,
    /// instrument)` identity instead, and this catalog is where it gets
    /// built from.
    pub fn unique_notes(&self) -> Vec<NoteId> {
        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();

        for frame in &self.frames {
            for bucket in frame.notes_by_instrument.values() {
                for &id in bucket {
                    if seen.insert(self.store.get(id).identity()) {
                        ids.push(id);
                    }
                }
            }
        }

        ids.sort_by(|&a, &b| {
            let (note_a, note_b) = (self.store.get(a), self.store.get(b));
            note_a
                .start
                .total_cmp(&note_b.start)
                .then_with(|| note_a.instrument.cmp(&note_b.instrument))
        });
        ids
    }
}
