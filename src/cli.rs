use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::results::NanEncoding;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cast3m-extract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract named outputs of a Cast3m run as one JSON object")]
#[command(
    long_about = "Reads castem.out, every *.txt and every *.csv file of a Cast3m output \
                  directory and prints the variables they hold as a single flat JSON object. \
                  Table values override text values, which override log variables."
)]
#[command(after_help = "EXAMPLES:\n  \
    cast3m-extract\n  \
    cast3m-extract --dir runs/case_12 --pretty\n  \
    cast3m-extract --nan string -v\n  \
    cast3m-extract --dry-run")]
pub struct Cli {
    /// Solver output directory to read
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Name of the solver log inside the directory
    #[arg(long, help = "Solver log file name (default: castem.out)")]
    pub log_file: Option<String>,

    /// Encoding of NaN and infinite values
    #[arg(long = "nan", value_enum)]
    pub nan_encoding: Option<NanEncoding>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Verbose diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    pub plain: bool,

    /// List the files that would be read without extracting
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Write a sample configuration file and exit")]
    pub generate_config: bool,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref(), &self.dir)?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_log_file(self.log_file.clone())
            .with_nan_encoding(self.nan_encoding)
            .with_pretty(self.pretty)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default `env_logger` filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "cast3m_extract=error";
        }

        match self.verbose {
            0 => "cast3m_extract=warn",
            1 => "cast3m_extract=info",
            2 => "cast3m_extract=debug",
            _ => "cast3m_extract=trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_needed() {
        let cli = Cli::try_parse_from(["cast3m-extract"]).unwrap();

        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(cli.log_file.is_none());
        assert!(cli.nan_encoding.is_none());
        assert!(!cli.pretty);
        assert_eq!(cli.log_filter(), "cast3m_extract=warn");
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "cast3m-extract",
            "--dir",
            "out",
            "--log-file",
            "run.out",
            "--nan",
            "string",
            "--pretty",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.dir, PathBuf::from("out"));
        assert_eq!(cli.log_file.as_deref(), Some("run.out"));
        assert_eq!(cli.nan_encoding, Some(NanEncoding::String));
        assert!(cli.pretty);
        assert_eq!(cli.verbosity_level(), 2);
        assert_eq!(cli.log_filter(), "cast3m_extract=debug");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cast3m-extract", "-q", "-v"]).is_err());

        let cli = Cli::try_parse_from(["cast3m-extract", "-q"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
        assert_eq!(cli.log_filter(), "cast3m_extract=error");
    }

    #[test]
    fn test_invalid_nan_encoding() {
        assert!(Cli::try_parse_from(["cast3m-extract", "--nan", "literal"]).is_err());
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "cast3m-extract",
            "--dir",
            dir.as_str(),
            "--log-file",
            "other.out",
            "--pretty",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.sources.log_file, "other.out");
        assert!(config.output.pretty);
    }
}
