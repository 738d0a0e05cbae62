pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod results;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::Cli;
pub use config::{CliOverrides, Config, OutputConfig, SourceConfig};
pub use error::{ExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    Assignment, Column, ColumnKey, ExtractionReport, LogVariableExtractor, TableContents,
    TableFileLoader, TextFileLoader,
};
pub use results::{merge, serialize, NanEncoding, ResultSet, ResultValue};
pub use scanner::{ArtifactFilter, ArtifactKind, ArtifactScanner, DataFile};
pub use ui::{OutputFormatter, OutputMode};

use std::path::Path;

/// Everything one extraction pass produced.
#[derive(Debug)]
pub struct Extraction {
    pub values: ResultSet,
    pub report: ExtractionReport,
}

/// Main library interface: runs the three extractors over a directory and
/// merges their results.
pub struct Cast3mExtract {
    config: Config,
    output_formatter: OutputFormatter,
}

impl Cast3mExtract {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = if cli_args.plain {
            OutputMode::Plain
        } else {
            OutputMode::Human
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Extracts every output found in `dir`.
    ///
    /// Per-file failures are recorded in the report; only an unusable
    /// directory is an error.
    pub fn extract(&self, dir: &Path) -> Result<Extraction> {
        ensure_directory(dir)?;

        let sources = &self.config.sources;
        let mut report = ExtractionReport::new();

        let log_set = LogVariableExtractor::new(sources).extract(&self.config.log_path(dir), &mut report);
        let text_set = TextFileLoader::new(sources).extract(dir, &sources.log_file, &mut report);
        let table_set = TableFileLoader::new(sources)?.extract(dir, &mut report);

        let values = merge(log_set, text_set, table_set);
        log::info!("Merged {} outputs from {}", values.len(), dir.display());

        Ok(Extraction { values, report })
    }

    /// Extracts `dir` and writes the JSON document to stdout.
    pub fn run(&self, dir: &Path) -> Result<ExtractionReport> {
        let extraction = self.extract(dir)?;

        self.output_formatter.print_document(
            &extraction.values,
            self.config.output.nan_encoding,
            self.config.output.pretty,
        )?;
        self.output_formatter
            .print_extraction_summary(&extraction.report);

        Ok(extraction.report)
    }

    /// Serializes the outputs of `dir` with the configured encoding.
    pub fn extract_json(&self, dir: &Path) -> Result<String> {
        let extraction = self.extract(dir)?;
        serialize(
            &extraction.values,
            self.config.output.nan_encoding,
            self.config.output.pretty,
        )
    }

    /// Lists the artifacts an extraction of `dir` would read, in merge order.
    pub fn plan(&self, dir: &Path) -> Result<Vec<DataFile>> {
        ensure_directory(dir)?;

        let sources = &self.config.sources;
        let artifacts = ArtifactScanner::new(sources).scan_directory(dir)?;
        let (mut texts, tables): (Vec<_>, Vec<_>) = artifacts
            .into_iter()
            .partition(|artifact| artifact.kind == ArtifactKind::Text);
        texts.extend(tables);

        Ok(texts)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &ExtractError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extracts `dir` with the default configuration.
pub fn extract_outputs<P: AsRef<Path>>(dir: P) -> Result<ResultSet> {
    let extractor = Cast3mExtract::new(Config::default(), OutputMode::Plain, 0, true);
    Ok(extractor.extract(dir.as_ref())?.values)
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ExtractError::InvalidPath {
            path: format!("{} is not a readable directory", dir.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_extractor(config: Config) -> Cast3mExtract {
        Cast3mExtract::new(config, OutputMode::Plain, 0, true)
    }

    fn write_run(dir: &Path) {
        fs::write(
            dir.join("castem.out"),
            "$ a=2.0\n dep_P2=-5.14286E-02; * displacement\n a=1.0;\nc=abc\n",
        )
        .unwrap();
        fs::write(dir.join("result.txt"), "3.14\n").unwrap();
        fs::write(dir.join("label.txt"), "hello world").unwrap();
        fs::write(dir.join("curve.csv"), "a;y\n1;2\n3;4\n").unwrap();
        fs::write(dir.join("data.csv"), "1;2\n3;4\n").unwrap();
    }

    #[test]
    fn test_full_extraction() {
        let temp_dir = TempDir::new().unwrap();
        write_run(temp_dir.path());

        let extraction = quiet_extractor(Config::default())
            .extract(temp_dir.path())
            .unwrap();
        let values = extraction.values;

        assert_eq!(values.get("dep_P2"), Some(&ResultValue::Scalar(-0.0514286)));
        assert_eq!(values.get("c"), Some(&ResultValue::Missing));
        assert_eq!(values.get("result"), Some(&ResultValue::Scalar(3.14)));
        assert_eq!(
            values.get("label"),
            Some(&ResultValue::Text("hello world".to_string()))
        );
        // The table column wins over the log variable.
        assert_eq!(values.get("a"), Some(&ResultValue::Column(vec![1.0, 3.0])));
        assert_eq!(values.get("y"), Some(&ResultValue::Column(vec![2.0, 4.0])));
        assert_eq!(
            values.get("data"),
            Some(&ResultValue::Table(vec![vec![1.0, 2.0], vec![3.0, 4.0]]))
        );

        assert!(extraction.report.log_found);
        assert_eq!(extraction.report.files_processed, 4);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        write_run(temp_dir.path());
        let extractor = quiet_extractor(Config::default());

        let first = extractor.extract_json(temp_dir.path()).unwrap();
        let second = extractor.extract_json(temp_dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let values = extract_outputs(temp_dir.path()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = extract_outputs(temp_dir.path().join("absent"));
        assert!(matches!(result, Err(ExtractError::InvalidPath { .. })));
    }

    #[test]
    fn test_plan_lists_texts_then_tables() {
        let temp_dir = TempDir::new().unwrap();
        write_run(temp_dir.path());

        let plan = quiet_extractor(Config::default())
            .plan(temp_dir.path())
            .unwrap();
        let names: Vec<_> = plan.iter().map(|a| a.filename.as_str()).collect();

        assert_eq!(names, vec!["label.txt", "result.txt", "curve.csv", "data.csv"]);
    }

    #[test]
    fn test_string_nan_encoding() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("castem.out"), "c=abc\n").unwrap();
        let mut config = Config::default();
        config.output.nan_encoding = NanEncoding::String;

        let json = quiet_extractor(config).extract_json(temp_dir.path()).unwrap();
        assert_eq!(json, r#"{"c":"NaN"}"#);
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        Cast3mExtract::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[sources]"));
        assert!(content.contains("[output]"));
    }
}
