// Score module
// Input contract and the validated note interval store

mod store;
mod types;

pub use store::{NoteStore, ScoreError};
pub use types::{InstrumentTrack, NoteEvent, NoteId, RawNote, Score};
