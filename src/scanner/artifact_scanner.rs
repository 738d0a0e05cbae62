use crate::config::SourceConfig;
use crate::error::{ExtractError, Result};
use crate::scanner::file_filter::ArtifactFilter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Text,
    Table,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Text => write!(f, "text"),
            ArtifactKind::Table => write!(f, "table"),
        }
    }
}

/// A solver output file found by one scan.
#[derive(Debug, Clone)]
pub struct DataFile {
    pub path: PathBuf,
    pub filename: String,
    pub stem: String,
    pub kind: ArtifactKind,
    pub size: u64,
}

impl DataFile {
    pub fn new(path: PathBuf, kind: ArtifactKind, size: u64) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            filename,
            stem,
            kind,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct ArtifactScanner {
    filter: ArtifactFilter,
}

impl ArtifactScanner {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            filter: ArtifactFilter::new(config),
        }
    }

    /// Lists the artifacts directly inside `root`, sorted by file name.
    ///
    /// Entries that cannot be inspected are logged and skipped.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DataFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(ExtractError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut artifacts = Vec::new();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Scan error in {}: {}", root_path.display(), err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(kind) = self.filter.classify(entry.path()) else {
                continue;
            };

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    log::warn!("Cannot stat {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            log::trace!("Found {} artifact {}", kind, entry.path().display());
            artifacts.push(DataFile::new(entry.into_path(), kind, size));
        }

        Ok(artifacts)
    }

    pub fn scan_kind<P: AsRef<Path>>(&self, root: P, kind: ArtifactKind) -> Result<Vec<DataFile>> {
        let mut artifacts = self.scan_directory(root)?;
        artifacts.retain(|artifact| artifact.kind == kind);
        Ok(artifacts)
    }
}
