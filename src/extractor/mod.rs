pub mod log_extractor;
pub mod report;
pub mod table_loader;
pub mod text_loader;

pub use log_extractor::{Assignment, LogVariableExtractor};
pub use report::ExtractionReport;
pub use table_loader::{Column, ColumnKey, TableContents, TableFileLoader};
pub use text_loader::TextFileLoader;

use crate::error::{ExtractError, Result};
use std::borrow::Cow;
use std::path::Path;

/// Reads a whole artifact as text. Content that is not valid UTF-8 is an
/// error, so a damaged file is omitted rather than silently altered.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|source| ExtractError::Decode {
        path: path.display().to_string(),
        source,
    })
}

/// Reads the solver log, dropping bytes that are not valid UTF-8.
///
/// Cast3m echoes Latin-1 comments into its log; only the ASCII assignments
/// matter, so the rest of the log is kept.
pub(crate) fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_lossy(&bytes))
}

fn decode_lossy(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => text.replace(char::REPLACEMENT_CHARACTER, ""),
    }
}
