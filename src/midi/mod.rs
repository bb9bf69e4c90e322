// MIDI module
// Standard MIDI File loading and General MIDI vocabulary

pub mod gm;
mod loader;

pub use loader::{load_bytes, load_file, MidiError};
