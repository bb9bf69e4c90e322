// Tabular export
// One row per change point, one column per instrument, pitches ascending

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::timeline::Timeline;
use super::ExportError;

/// Write the timeline as CSV: header `time_sec,<label>,...`, then one row
/// per change point. Each instrument cell is the space-separated list of
/// active pitches re-sorted ascending by pitch — display order is pitch
/// order, independent of the engine's internal active-note order. Empty
/// cell when the instrument is silent.
///
/// All fields are numeric or simple labels, so no quoting or escaping is
/// applied. An empty timeline produces the header row alone.
pub fn write_csv<W: Write>(timeline: &Timeline, writer: &mut W) -> Result<(), ExportError> {
    write!(writer, "time_sec")?;
    for label in timeline.instrument_names().values() {
        write!(writer, ",{}", label)?;
    }
    writeln!(writer)?;

    for frame in timeline.frames() {
        write!(writer, "{}", frame.time)?;
        for instrument in 0..timeline.instrument_count() {
            let mut pitches: Vec<u8> = frame
                .notes_for(instrument)
                .iter()
                .map(|&id| timeline.note(id).pitch)
                .collect();
            pitches.sort_unstable();

            let cell = pitches
                .iter()
                .map(|pitch| pitch.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            write!(writer, ",{}", cell)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write the timeline CSV to a file
pub fn write_csv_file(timeline: &Timeline, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_csv(timeline, &mut writer)?;
    writer.flush()?;

    log::info!("Wrote timeline CSV to {}", path.display());
    Ok(())
}
