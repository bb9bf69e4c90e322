// Frame construction
// Sweep over the change points carrying the active-note set between frames

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::score::{NoteId, NoteStore};
use super::change_points::collect_change_points;

/// Snapshot of every sounding note at one change point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFrame {
    /// Timestamp of this change point, seconds
    pub time: f64,

    /// Active notes per instrument, in canonical order. Instruments with
    /// nothing sounding are omitted entirely.
    pub notes_by_instrument: BTreeMap<usize, Vec<NoteId>>,
}

impl TimelineFrame {
    /// Total active notes across all instruments
    pub fn active_count(&self) -> usize {
        self.notes_by_instrument.values().map(Vec::len).sum()
    }

    /// True when nothing is sounding at this instant
    pub fn is_silent(&self) -> bool {
        self.notes_by_instrument.is_empty()
    }

    /// Active notes for one instrument, empty if it has none
    pub fn notes_for(&self, instrument: usize) -> &[NoteId] {
        self.notes_by_instrument
            .get(&instrument)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The canonical active-note order: duration descending, then pitch
/// ascending, then arena order. One explicit total order, applied everywhere
/// the engine sorts active notes.
fn canonical_order(store: &NoteStore, a: NoteId, b: NoteId) -> Ordering {
    let (note_a, note_b) = (store.get(a), store.get(b));
    note_b
        .duration
        .total_cmp(&note_a.duration)
        .then_with(|| note_a.pitch.cmp(&note_b.pitch))
        .then_with(|| a.cmp(&b))
}

/// Build one frame per change point.
///
/// Classic sweep: two cursors walk the notes ordered by start and by end,
/// the active set is carried from frame to frame, and only instrument
/// buckets that gained a note are re-sorted (removal preserves order).
/// Produces exactly the frames a full scan per point would.
pub(super) fn build_frames(store: &NoteStore) -> Vec<TimelineFrame> {
    let points = collect_change_points(store.notes());

    let mut by_start: Vec<NoteId> = store.ids().collect();
    by_start.sort_by(|&a, &b| store.get(a).start.total_cmp(&store.get(b).start));
    let mut by_end: Vec<NoteId> = store.ids().collect();
    by_end.sort_by(|&a, &b| store.get(a).end.total_cmp(&store.get(b).end));

    let mut frames = Vec::with_capacity(points.len());
    let mut active: BTreeMap<usize, Vec<NoteId>> = BTreeMap::new();
    let mut next_start = 0;
    let mut next_end = 0;

    for &t in &points {
        // Retire first: half-open intervals, a note ending at t is already
        // silent at t.
        while next_end < by_end.len() && store.get(by_end[next_end]).end <= t {
            let id = by_end[next_end];
            let instrument = store.get(id).instrument;
            if let Some(bucket) = active.get_mut(&instrument) {
                bucket.retain(|&other| other != id);
                if bucket.is_empty() {
                    active.remove(&instrument);
                }
            }
            next_end += 1;
        }

        let mut dirty: Vec<usize> = Vec::new();
        while next_start < by_start.len() && store.get(by_start[next_start]).start <= t {
            let id = by_start[next_start];
            let instrument = store.get(id).instrument;
            active.entry(instrument).or_default().push(id);
            if !dirty.contains(&instrument) {
                dirty.push(instrument);
            }
            next_start += 1;
        }
        for instrument in dirty {
            if let Some(bucket) = active.get_mut(&instrument) {
                bucket.sort_by(|&a, &b| canonical_order(store, a, b));
            }
        }

        frames.push(TimelineFrame {
            time: t,
            notes_by_instrument: active.clone(),
        });
    }

    frames
}
