use crate::config::SourceConfig;
use crate::extractor::{read_text, ExtractionReport};
use crate::results::{ResultSet, ResultValue};
use crate::scanner::{ArtifactKind, ArtifactScanner, DataFile};
use std::path::Path;

/// Loads standalone text artifacts, one value per file keyed by file stem.
pub struct TextFileLoader {
    scanner: ArtifactScanner,
}

impl TextFileLoader {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            scanner: ArtifactScanner::new(config),
        }
    }

    pub fn extract(
        &self,
        directory: &Path,
        exclude_name: &str,
        report: &mut ExtractionReport,
    ) -> ResultSet {
        let files = match self.scanner.scan_kind(directory, ArtifactKind::Text) {
            Ok(files) => files,
            Err(e) => {
                let message = format!("Cannot list text files: {}", e);
                log::warn!("{}", message);
                report.errors.push(message);
                return ResultSet::new();
            }
        };

        let files: Vec<DataFile> = files
            .into_iter()
            .filter(|file| file.filename != exclude_name)
            .collect();

        self.extract_files(&files, report)
    }

    /// Loads `files` in order; a later file wins a stem collision.
    pub fn extract_files(&self, files: &[DataFile], report: &mut ExtractionReport) -> ResultSet {
        let mut values = ResultSet::new();

        for file in files {
            match read_text(&file.path) {
                Ok(content) => {
                    report.record_file(file.size);
                    let value = ResultValue::from_text(&content);
                    log::debug!("{} -> {} ({})", file.filename, file.stem, value.kind());
                    if values.insert(file.stem.clone(), value).is_some() {
                        log::debug!("{} overrides an earlier file with stem {}", file.filename, file.stem);
                    }
                }
                Err(e) => {
                    report.skip_file(format!("Failed to read {}: {}", file.display_path(), e));
                }
            }
        }

        log::info!("Read {} text values", values.len());
        values
    }
}

impl Default for TextFileLoader {
    fn default() -> Self {
        Self::new(&SourceConfig::default())
    }
}
