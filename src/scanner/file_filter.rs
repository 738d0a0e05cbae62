use crate::config::SourceConfig;
use crate::scanner::ArtifactKind;
use regex::Regex;
use std::path::Path;

pub struct ArtifactFilter {
    text_extension: String,
    table_extension: String,
    excluded_names: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl ArtifactFilter {
    pub fn new(config: &SourceConfig) -> Self {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            text_extension: config.text_extension.clone(),
            table_extension: config.table_extension.clone(),
            excluded_names: vec![config.log_file.clone()],
            exclude_patterns,
        }
    }

    /// Classifies a file by extension, or `None` when it is not an artifact.
    /// Extensions compare case-sensitively, as `*.txt` does in a shell.
    pub fn classify(&self, path: &Path) -> Option<ArtifactKind> {
        let filename = path.file_name().and_then(|s| s.to_str())?;

        // Shell globs never match dot files.
        if filename.starts_with('.') {
            return None;
        }

        if self.is_excluded(filename) {
            return None;
        }

        let extension = path.extension().and_then(|s| s.to_str())?;
        if extension == self.text_extension {
            Some(ArtifactKind::Text)
        } else if extension == self.table_extension {
            Some(ArtifactKind::Table)
        } else {
            None
        }
    }

    pub fn is_excluded(&self, filename: &str) -> bool {
        self.excluded_names.iter().any(|name| name == filename)
            || self.matches_any_pattern(filename)
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        let config = SourceConfig::default();
        Self::new(&config)
    }
}
