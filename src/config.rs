use crate::error::{ExtractError, Result};
use crate::results::NanEncoding;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in the scanned directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["cast3m-extract.toml", ".cast3m-extract.toml"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourceConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    pub log_file: String,
    pub text_extension: String,
    pub table_extension: String,
    pub delimiter: char,
    pub comment_marker: char,
    pub statement_separator: char,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub nan_encoding: NanEncoding,
    pub pretty: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            log_file: "castem.out".to_string(),
            text_extension: "txt".to_string(),
            table_extension: "csv".to_string(),
            delimiter: ';',
            comment_marker: '$',
            statement_separator: ';',
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            nan_encoding: NanEncoding::Null,
            pretty: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    /// Loads `config_path` if given, else the first default config file found
    /// in `search_dir`, else the built-in defaults.
    pub fn load_with_defaults<P: AsRef<Path>>(
        config_path: Option<P>,
        search_dir: &Path,
    ) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for name in DEFAULT_CONFIG_FILES {
                    let candidate = search_dir.join(name);
                    if candidate.is_file() {
                        return Self::load_from_file(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref log_file) = cli_args.log_file {
            self.sources.log_file = log_file.clone();
        }

        if let Some(nan_encoding) = cli_args.nan_encoding {
            self.output.nan_encoding = nan_encoding;
        }

        if cli_args.pretty {
            self.output.pretty = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ExtractError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ExtractError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let sources = &self.sources;

        if sources.log_file.trim().is_empty() {
            return Err(ExtractError::Config {
                message: "Log file name must not be empty".to_string(),
            });
        }

        if sources.log_file.contains('/') || sources.log_file.contains('\\') {
            return Err(ExtractError::Config {
                message: format!(
                    "Log file must be a plain file name, got: {}",
                    sources.log_file
                ),
            });
        }

        for (label, ext) in [
            ("Text", &sources.text_extension),
            ("Table", &sources.table_extension),
        ] {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ExtractError::Config {
                    message: format!(
                        "{} extension must be non-empty and given without a leading dot",
                        label
                    ),
                });
            }
        }

        if sources.text_extension == sources.table_extension {
            return Err(ExtractError::Config {
                message: "Text and table extensions must differ".to_string(),
            });
        }

        // The CSV reader works on single bytes.
        if !sources.delimiter.is_ascii() {
            return Err(ExtractError::Config {
                message: format!("Unsupported table delimiter: {:?}", sources.delimiter),
            });
        }

        if sources.comment_marker.is_whitespace() || sources.statement_separator.is_whitespace() {
            return Err(ExtractError::Config {
                message: "Comment marker and statement separator must be visible characters"
                    .to_string(),
            });
        }

        for pattern in &sources.exclude_patterns {
            Regex::new(pattern).map_err(|e| ExtractError::Config {
                message: format!("Invalid exclude pattern '{}': {}", pattern, e),
            })?;
        }

        Ok(())
    }

    pub fn log_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.sources.log_file)
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_file: Option<String>,
    pub nan_encoding: Option<NanEncoding>,
    pub pretty: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_file(mut self, log_file: Option<String>) -> Self {
        self.log_file = log_file;
        self
    }

    pub fn with_nan_encoding(mut self, nan_encoding: Option<NanEncoding>) -> Self {
        self.nan_encoding = nan_encoding;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sources.log_file, "castem.out");
        assert_eq!(config.sources.delimiter, ';');
        assert_eq!(config.sources.comment_marker, '$');
        assert_eq!(config.output.nan_encoding, NanEncoding::Null);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.sources.table_extension = "txt".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sources.delimiter = 'é';
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sources.exclude_patterns = vec!["(".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sources.log_file = "../castem.out".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.output.nan_encoding = NanEncoding::String;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();
        let content = fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("[sources]"));
        assert!(content.contains("[output]"));

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.output.nan_encoding, NanEncoding::String);
        assert_eq!(loaded_config.sources.log_file, "castem.out");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("cast3m-extract.toml"),
            "[output]\npretty = true\n",
        )
        .unwrap();

        let config = Config::load_with_defaults(None::<&Path>, temp_dir.path()).unwrap();
        assert!(config.output.pretty);
        assert_eq!(config.sources.table_extension, "csv");
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.toml");
        assert!(Config::load_with_defaults(Some(&missing), temp_dir.path()).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_log_file(Some("run.out".to_string()))
            .with_nan_encoding(Some(NanEncoding::String))
            .with_pretty(true);

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.sources.log_file, "run.out");
        assert_eq!(config.output.nan_encoding, NanEncoding::String);
        assert!(config.output.pretty);
    }
}
