use crate::error::{ExtractError, Result, UserFriendlyError};
use crate::extractor::ExtractionReport;
use crate::results::{write_document, NanEncoding, ResultSet};
use crate::scanner::DataFile;
use console::{style, Emoji, Term};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

/// Writes the JSON document to stdout and everything else to stderr, so that
/// stdout stays machine-readable.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stderr().features().colors_supported() && !quiet,
            OutputMode::Plain => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.should_show_message(1) {
            self.print_message(MessageType::Success, message);
        }
    }

    pub fn error(&self, message: &str) {
        self.print_message(MessageType::Error, message);
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            self.print_message(MessageType::Warning, message);
        }
    }

    pub fn print_user_friendly_error(&self, error: &ExtractError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human if self.use_colors => eprintln!(
                    "{}{}",
                    INFO,
                    style(format!("Suggestion: {}", suggestion)).cyan()
                ),
                OutputMode::Human => eprintln!("Suggestion: {}", suggestion),
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// Writes the result document to stdout followed by a newline.
    pub fn print_document(&self, set: &ResultSet, encoding: NanEncoding, pretty: bool) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write_document(&mut handle, set, encoding, pretty)?;
        writeln!(handle)?;
        handle.flush()?;
        Ok(())
    }

    pub fn print_extraction_summary(&self, report: &ExtractionReport) {
        if !self.should_show_message(1) {
            return;
        }

        for line in report.display_summary().lines() {
            self.debug_or_plain(line);
        }
        self.debug_or_plain(&format!(
            "  Bytes read (human): {}",
            format_bytes(report.bytes_processed)
        ));
        self.debug_or_plain(&format!("  Time taken: {}", format_duration(report.elapsed())));

        if report.is_degraded() {
            self.warning(&format!(
                "{} file(s) could not be read; their outputs are missing",
                report.errors.len()
            ));
        } else {
            self.success("Extraction completed");
        }
    }

    /// Lists what an extraction would read. Used by `--dry-run`.
    pub fn print_plan(&self, log_path: &Path, artifacts: &[DataFile]) {
        self.print_header("Extraction plan");

        let log_state = if log_path.is_file() { "present" } else { "absent" };
        eprintln!("Log file: {} ({})", log_path.display(), log_state);

        if artifacts.is_empty() {
            eprintln!("No text or table artifacts found");
        } else {
            eprintln!("Artifacts, in merge order:");
            for artifact in artifacts {
                eprintln!(
                    "  [{}] {} -> {} ({})",
                    artifact.kind,
                    artifact.filename,
                    artifact.stem,
                    format_bytes(artifact.size)
                );
            }
        }

        self.print_separator();
    }

    pub fn print_header(&self, title: &str) {
        match self.mode {
            OutputMode::Human if self.use_colors => {
                eprintln!("{} {}", SPARKLES, style(title).bold().cyan());
            }
            _ => eprintln!("=== {} ===", title),
        }
    }

    pub fn print_separator(&self) {
        eprintln!("{}", "-".repeat(60));
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn debug_or_plain(&self, line: &str) {
        if self.use_colors {
            eprintln!("{}", style(line).dim());
        } else {
            eprintln!("{}", line);
        }
    }

    fn print_message(&self, msg_type: MessageType, message: &str) {
        if self.mode == OutputMode::Plain {
            let label = match msg_type {
                MessageType::Success => "SUCCESS",
                MessageType::Error => "ERROR",
                MessageType::Warning => "WARNING",
            };
            eprintln!("{}: {}", label, message);
            return;
        }

        if self.use_colors {
            let styled = match msg_type {
                MessageType::Success => style(message).green().bold(),
                MessageType::Error => style(message).red().bold(),
                MessageType::Warning => style(message).yellow().bold(),
            };
            let emoji = match msg_type {
                MessageType::Success => CHECKMARK,
                MessageType::Error => CROSS,
                MessageType::Warning => WARNING,
            };
            eprintln!("{}{}", emoji, styled);
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
            };
            eprintln!("{} {}", prefix, message);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.use_colors);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_plain_mode_has_no_colors() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(20)), "20ms");
    }
}
