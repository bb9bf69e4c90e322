// Change-point collection
// The timeline's temporal resolution: every note boundary, sorted, deduped

use crate::score::NoteEvent;

/// Collect the sorted, de-duplicated set of all interval boundaries.
///
/// Every `start` and every `end` is an instant where the active-note set can
/// change; nothing between two consecutive boundaries can. Sorting uses the
/// total order on f64 (ingestion already rejected non-finite timestamps) and
/// never a hash set, so identical input always yields identical output.
pub fn collect_change_points(notes: &[NoteEvent]) -> Vec<f64> {
    let mut points = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        points.push(note.start);
        points.push(note.end);
    }

    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(instrument: usize, pitch: u8, start: f64, end: f64) -> NoteEvent {
        NoteEvent {
            pitch,
            velocity: 100,
            start,
            end,
            duration: end - start,
            instrument,
            color: crate::palette::color_for(instrument).to_string(),
        }
    }

    #[test]
    fn test_empty_notes_yield_no_points() {
        assert!(collect_change_points(&[]).is_empty());
    }

    #[test]
    fn test_boundaries_are_sorted_and_deduped() {
        let notes = vec![
            note(0, 60, 0.0, 2.0),
            note(1, 64, 1.0, 3.0),
            // Shares both boundaries with the first note
            note(0, 67, 0.0, 2.0),
        ];

        assert_eq!(collect_change_points(&notes), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_start_of_one_note_equal_to_end_of_another_collapses() {
        let notes = vec![note(0, 60, 0.0, 1.0), note(0, 62, 1.0, 2.0)];
        assert_eq!(collect_change_points(&notes), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_identical_input_yields_identical_output() {
        let notes = vec![
            note(0, 60, 0.25, 1.5),
            note(1, 72, 0.75, 2.25),
            note(2, 48, 0.25, 2.25),
        ];

        assert_eq!(collect_change_points(&notes), collect_change_points(&notes));
    }
}
