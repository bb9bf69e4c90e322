// JSON export
// Full timeline document for downstream tooling

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::timeline::Timeline;
use super::ExportError;

/// Write the complete timeline document as pretty-printed JSON: the note
/// arena, every frame (notes as arena indices), and the aggregate tables.
pub fn write_json<W: Write>(timeline: &Timeline, writer: &mut W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut *writer, timeline)?;
    writeln!(writer)?;
    Ok(())
}

/// Write the timeline JSON document to a file
pub fn write_json_file(timeline: &Timeline, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(timeline, &mut writer)?;
    writer.flush()?;

    log::info!("Wrote timeline JSON to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{InstrumentTrack, RawNote, Score};
    use tempfile::TempDir;

    fn timeline() -> Timeline {
        let score = Score {
            instruments: vec![InstrumentTrack {
                name: None,
                program: None,
                notes: vec![RawNote { pitch: 60, velocity: 100, start: 0.0, end: 1.0 }],
            }],
        };
        Timeline::extract(&score).unwrap()
    }

    #[test]
    fn test_document_carries_frames_and_aggregates() {
        let mut out = Vec::new();
        write_json(&timeline(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["max_concurrent_notes"], 1);
        assert_eq!(value["frames"].as_array().unwrap().len(), 2);
        assert_eq!(value["instrument_colors"]["0"], "#FF6B6B");
    }

    #[test]
    fn test_write_to_file_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("timeline.json");

        write_json_file(&timeline(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["frames"].is_array());
    }
}
