// Radial layout
// Per-instant wedge geometry for the circular note display

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::score::{NoteEvent, NoteId};
use crate::timeline::Timeline;

/// Geometry knobs for the radial display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Radius of a pitch-0 wedge
    pub base_radius: f64,

    /// Extra radius per MIDI pitch step
    pub radius_scale: f64,

    /// Fraction of the note's lifetime spent growing to full radius
    pub attack: f64,

    /// Fraction of the note's lifetime spent shrinking back to zero
    pub release: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            base_radius: 100.0,
            radius_scale: 2.0,
            attack: 0.15,
            release: 0.15,
        }
    }
}

impl LayoutConfig {
    /// Full radius for a pitch: higher notes draw farther out
    pub fn max_radius(&self, pitch: u8) -> f64 {
        self.base_radius + f64::from(pitch) * self.radius_scale
    }

    /// Radius at instant `t` under the attack/release envelope: a linear
    /// ramp in over the attack fraction, full radius through the middle, a
    /// linear ramp out over the release fraction.
    pub fn envelope_radius(&self, note: &NoteEvent, t: f64) -> f64 {
        let max = self.max_radius(note.pitch);
        let p = progress(note, t);

        if p < self.attack {
            max * (p / self.attack)
        } else if p > 1.0 - self.release {
            max * ((1.0 - p) / self.release)
        } else {
            max
        }
    }
}

/// Normalized position of `t` within the note's lifetime
pub fn progress(note: &NoteEvent, t: f64) -> f64 {
    if note.duration > 0.0 {
        (t - note.start) / note.duration
    } else {
        0.0
    }
}

/// Visual liveness is closed on both ends: the release edge still draws,
/// unlike the engine's half-open frame membership.
pub fn is_alive(note: &NoteEvent, t: f64) -> bool {
    note.start <= t && t <= note.end
}

/// One note's slice of the circle at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteWedge {
    /// Handle into the timeline's note arena
    pub note: NoteId,

    /// Start angle, radians
    pub angle_start: f64,

    /// Angular size, radians
    pub angle_size: f64,

    /// Outer radius at this instant
    pub radius: f64,
}

impl NoteWedge {
    /// Fan vertices: the origin, then `resolution` points along the arc.
    pub fn vertices(&self, resolution: usize) -> Vec<[f64; 2]> {
        let mut points = Vec::with_capacity(resolution + 1);
        points.push([0.0, 0.0]);

        let step = if resolution > 1 {
            self.angle_size / (resolution - 1) as f64
        } else {
            0.0
        };
        for i in 0..resolution {
            let angle = self.angle_start + step * i as f64;
            points.push([self.radius * angle.cos(), self.radius * angle.sin()]);
        }
        points
    }
}

/// Assigns every concurrently-sounding note an equal slice of the circle.
///
/// The slot size comes from the timeline's peak concurrency, so a note's
/// angular size never changes while it sounds and the busiest frame exactly
/// fills the circle. Wedges are plain data addressed by arena handles;
/// callers own whatever per-note state they build from them.
#[derive(Debug, Clone, Serialize)]
pub struct RadialLayout {
    config: LayoutConfig,
    angle_per_note: f64,
}

impl RadialLayout {
    pub fn new(timeline: &Timeline) -> Self {
        Self::with_config(timeline, LayoutConfig::default())
    }

    pub fn with_config(timeline: &Timeline, config: LayoutConfig) -> Self {
        let slots = timeline.max_concurrent_notes();
        let angle_per_note = if slots > 0 { TAU / slots as f64 } else { 0.0 };

        RadialLayout { config, angle_per_note }
    }

    /// Angular size of one note slot
    pub fn angle_per_note(&self) -> f64 {
        self.angle_per_note
    }

    /// Wedges for every note sounding at instant `t`, in frame order:
    /// instrument ascending, canonical note order within each instrument,
    /// taking consecutive slots from angle zero. Empty before the first
    /// change point and on an empty timeline.
    pub fn wedges_at(&self, timeline: &Timeline, t: f64) -> Vec<NoteWedge> {
        let frame = match timeline.frame_at(t) {
            Some(frame) => frame,
            None => return Vec::new(),
        };

        let mut wedges = Vec::with_capacity(frame.active_count());
        let mut cursor = 0.0;

        for bucket in frame.notes_by_instrument.values() {
            for &id in bucket {
                let note = timeline.note(id);
                wedges.push(NoteWedge {
                    note: id,
                    angle_start: cursor,
                    angle_size: self.angle_per_note,
                    radius: self.config.envelope_radius(note, t),
                });
                cursor += self.angle_per_note;
            }
        }
        wedges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{InstrumentTrack, RawNote, Score};

    fn note(pitch: u8, start: f64, end: f64) -> NoteEvent {
        NoteEvent {
            pitch,
            velocity: 100,
            start,
            end,
            duration: end - start,
            instrument: 0,
            color: "#FF6B6B".to_string(),
        }
    }

    fn timeline(tracks: Vec<Vec<(u8, f64, f64)>>) -> Timeline {
        let score = Score {
            instruments: tracks
                .into_iter()
                .map(|notes| InstrumentTrack {
                    name: None,
                    program: None,
                    notes: notes
                        .into_iter()
                        .map(|(pitch, start, end)| RawNote { pitch, velocity: 100, start, end })
                        .collect(),
                })
                .collect(),
        };
        Timeline::extract(&score).unwrap()
    }

    #[test]
    fn test_max_radius_scales_with_pitch() {
        let config = LayoutConfig::default();
        assert_eq!(config.max_radius(0), 100.0);
        assert_eq!(config.max_radius(60), 220.0);
        assert_eq!(config.max_radius(127), 354.0);
    }

    #[test]
    fn test_envelope_ramps_in_and_out() {
        let config = LayoutConfig::default();
        let n = note(60, 0.0, 1.0);
        let max = config.max_radius(60);

        // Halfway through the attack: half radius
        assert!((config.envelope_radius(&n, 0.075) - max * 0.5).abs() < 1e-9);
        // Sustained middle: full radius
        assert_eq!(config.envelope_radius(&n, 0.5), max);
        // Halfway through the release: half radius again
        assert!((config.envelope_radius(&n, 0.925) - max * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_and_liveness() {
        let n = note(60, 1.0, 3.0);

        assert_eq!(progress(&n, 1.0), 0.0);
        assert_eq!(progress(&n, 2.0), 0.5);
        assert_eq!(progress(&n, 3.0), 1.0);

        assert!(is_alive(&n, 1.0));
        // Closed on the release edge, unlike frame membership
        assert!(is_alive(&n, 3.0));
        assert!(!is_alive(&n, 3.1));
    }

    #[test]
    fn test_slots_exactly_fill_the_circle_at_peak() {
        // Peak concurrency 3 in the same instrument
        let timeline = timeline(vec![vec![
            (60, 0.0, 3.0),
            (64, 0.0, 2.0),
            (67, 0.0, 1.0),
        ]]);
        let layout = RadialLayout::new(&timeline);

        let wedges = layout.wedges_at(&timeline, 0.5);
        assert_eq!(wedges.len(), 3);

        let total: f64 = wedges.iter().map(|w| w.angle_size).sum();
        assert!((total - TAU).abs() < 1e-9);

        // Consecutive slots from angle zero
        assert_eq!(wedges[0].angle_start, 0.0);
        assert!((wedges[1].angle_start - layout.angle_per_note()).abs() < 1e-9);
    }

    #[test]
    fn test_wedges_follow_frame_order() {
        // Two instruments: instrument 0's wedge comes first even though
        // instrument 1's note is higher-pitched and longer
        let timeline = timeline(vec![vec![(60, 0.0, 1.0)], vec![(72, 0.0, 2.0)]]);
        let layout = RadialLayout::new(&timeline);

        let wedges = layout.wedges_at(&timeline, 0.5);
        assert_eq!(timeline.note(wedges[0].note).instrument, 0);
        assert_eq!(timeline.note(wedges[1].note).instrument, 1);
    }

    #[test]
    fn test_no_wedges_before_the_first_change_point_or_when_empty() {
        let populated = timeline(vec![vec![(60, 1.0, 2.0)]]);
        let layout = RadialLayout::new(&populated);
        assert!(layout.wedges_at(&populated, 0.5).is_empty());

        let empty = timeline(vec![]);
        let layout = RadialLayout::new(&empty);
        assert_eq!(layout.angle_per_note(), 0.0);
        assert!(layout.wedges_at(&empty, 0.0).is_empty());
    }

    #[test]
    fn test_fan_vertices_span_the_wedge() {
        let wedge = NoteWedge {
            note: crate::score::NoteId(0),
            angle_start: 0.0,
            angle_size: TAU / 4.0,
            radius: 10.0,
        };

        let vertices = wedge.vertices(20);
        assert_eq!(vertices.len(), 21);
        assert_eq!(vertices[0], [0.0, 0.0]);

        // First arc point at angle 0, last at a quarter turn
        assert!((vertices[1][0] - 10.0).abs() < 1e-9);
        assert!(vertices[1][1].abs() < 1e-9);
        let last = vertices[20];
        assert!(last[0].abs() < 1e-9);
        assert!((last[1] - 10.0).abs() < 1e-9);
    }
}
