// Visual module
// Pure-data geometry for the radial note display; no windowing, no GPU

mod layout;

pub use layout::{is_alive, progress, LayoutConfig, NoteWedge, RadialLayout};
