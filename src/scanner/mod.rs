pub mod artifact_scanner;
pub mod file_filter;

pub use artifact_scanner::{ArtifactKind, ArtifactScanner, DataFile};
pub use file_filter::ArtifactFilter;
