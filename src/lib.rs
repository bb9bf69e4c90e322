// Lumiere - MIDI timeline extraction and radial visualization core
// Module declarations

pub mod export;
pub mod midi;
pub mod palette;
pub mod score;
pub mod timeline;
pub mod visual;

pub use score::{InstrumentTrack, NoteEvent, NoteId, NoteStore, RawNote, Score, ScoreError};
pub use timeline::{Timeline, TimelineFrame};
