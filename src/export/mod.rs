// Export adapters
// Thin formatting layers over the one extracted timeline

mod csv;
mod json;

pub use csv::{write_csv, write_csv_file};
pub use json::{write_json, write_json_file};

use thiserror::Error;

/// Errors raised while writing an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
