// MIDI file loading - Standard MIDI Files to Score via the midly crate
// Tick-to-second conversion lives here; the engine downstream never sees
// ticks, beats, or BPM

use std::collections::HashMap;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use thiserror::Error;

use crate::score::{InstrumentTrack, RawNote, Score};

/// Default tempo when a file carries no set-tempo event: 120 BPM
const DEFAULT_US_PER_QUARTER: f64 = 500_000.0;

/// Errors raised while reading a MIDI file
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI parse error: {0}")]
    Parse(#[from] midly::Error),
}

/// Read a Standard MIDI File from disk into a [`Score`].
pub fn load_file(path: impl AsRef<Path>) -> Result<Score, MidiError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let score = load_bytes(&data)?;
    log::info!(
        "Loaded {}: {} instruments, {} notes",
        path.display(),
        score.instruments.len(),
        score.note_count()
    );
    Ok(score)
}

/// Parse Standard MIDI File bytes into a [`Score`].
///
/// One instrument per track that carries notes; meta-only tracks (tempo,
/// markers) produce no instrument. Note-on/note-off pairs are matched per
/// channel and key, with a velocity-0 note-on treated as a note-off. Notes
/// still sounding when the track ends are closed at the track's final tick.
pub fn load_bytes(data: &[u8]) -> Result<Score, MidiError> {
    let smf = Smf::parse(data)?;
    let tempo_map = TempoMap::from_smf(&smf);

    let instruments = smf
        .tracks
        .iter()
        .filter_map(|track| read_track(track, &tempo_map))
        .collect();

    Ok(Score { instruments })
}

/// Piecewise tick-to-second conversion built from every set-tempo event in
/// the file, across all tracks (format 1 files keep them in track 0 while
/// the notes live elsewhere).
struct TempoMap {
    /// (absolute tick, seconds at that tick, seconds per tick from there on)
    segments: Vec<(u64, f64, f64)>,
}

impl TempoMap {
    fn from_smf(smf: &Smf) -> Self {
        let ticks_per_quarter = match smf.header.timing {
            Timing::Metrical(tpq) => f64::from(tpq.as_int()),
            Timing::Timecode(fps, subframe) => {
                // SMPTE timing: wall-clock ticks, tempo events don't apply
                let frames_per_sec = match fps {
                    midly::Fps::Fps24 => 24.0,
                    midly::Fps::Fps25 => 25.0,
                    midly::Fps::Fps29 => 29.97,
                    midly::Fps::Fps30 => 30.0,
                };
                let seconds_per_tick = 1.0 / (frames_per_sec * f64::from(subframe));
                return TempoMap {
                    segments: vec![(0, 0.0, seconds_per_tick)],
                };
            }
        };

        let mut changes: Vec<(u64, u32)> = Vec::new();
        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track {
                tick += u64::from(event.delta.as_int());
                if let TrackEventKind::Meta(MetaMessage::Tempo(us_per_quarter)) = event.kind {
                    changes.push((tick, us_per_quarter.as_int()));
                }
            }
        }
        changes.sort_by_key(|&(tick, _)| tick);

        let mut segments = vec![(0, 0.0, DEFAULT_US_PER_QUARTER / 1_000_000.0 / ticks_per_quarter)];
        for (tick, us_per_quarter) in changes {
            let seconds_per_tick = f64::from(us_per_quarter) / 1_000_000.0 / ticks_per_quarter;
            let &(last_tick, last_seconds, last_rate) = segments.last().unwrap();
            if tick == last_tick {
                // Later set-tempo at the same tick wins
                segments.last_mut().unwrap().2 = seconds_per_tick;
            } else {
                let seconds = last_seconds + (tick - last_tick) as f64 * last_rate;
                segments.push((tick, seconds, seconds_per_tick));
            }
        }

        TempoMap { segments }
    }

    fn to_seconds(&self, tick: u64) -> f64 {
        let idx = self.segments.partition_point(|&(t, _, _)| t <= tick) - 1;
        let (segment_tick, segment_seconds, seconds_per_tick) = self.segments[idx];
        segment_seconds + (tick - segment_tick) as f64 * seconds_per_tick
    }
}

/// Collect one track's notes, name, and program. None if the track has no
/// notes at all.
fn read_track(events: &[TrackEvent], tempo_map: &TempoMap) -> Option<InstrumentTrack> {
    let mut tick = 0u64;
    let mut name: Option<String> = None;
    let mut program: Option<u8> = None;
    // (channel, key) -> (start seconds, velocity) for currently-open notes
    let mut open: HashMap<(u8, u8), (f64, u8)> = HashMap::new();
    let mut notes: Vec<RawNote> = Vec::new();

    for event in events {
        tick += u64::from(event.delta.as_int());

        match event.kind {
            TrackEventKind::Meta(MetaMessage::TrackName(raw)) => {
                if name.is_none() {
                    let text = String::from_utf8_lossy(raw).trim().to_string();
                    if !text.is_empty() {
                        name = Some(text);
                    }
                }
            }
            TrackEventKind::Midi { channel, message } => {
                let time = tempo_map.to_seconds(tick);
                match message {
                    MidiMessage::ProgramChange { program: p } => {
                        if program.is_none() {
                            program = Some(p.as_int());
                        }
                    }
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        open.insert((channel.as_int(), key.as_int()), (time, vel.as_int()));
                    }
                    // Velocity-0 note-on is a note-off in disguise
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        if let Some((start, velocity)) =
                            open.remove(&(channel.as_int(), key.as_int()))
                        {
                            notes.push(RawNote {
                                pitch: key.as_int(),
                                velocity,
                                start,
                                end: time,
                            });
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // Close anything still sounding at the track's final tick. Sorted drain
    // keeps the output independent of hash order.
    if !open.is_empty() {
        let end = tempo_map.to_seconds(tick);
        let mut leftovers: Vec<_> = open.into_iter().collect();
        leftovers.sort_by_key(|&((channel, key), _)| (channel, key));
        for ((_, key), (start, velocity)) in leftovers {
            notes.push(RawNote { pitch: key, velocity, start, end });
        }
    }

    if notes.is_empty() {
        return None;
    }

    notes.sort_by(|a, b| a.start.total_cmp(&b.start).then_with(|| a.pitch.cmp(&b.pitch)));

    Some(InstrumentTrack { name, program, notes })
}
