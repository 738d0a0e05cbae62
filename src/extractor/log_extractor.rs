use crate::config::SourceConfig;
use crate::extractor::{read_lossy, ExtractionReport};
use crate::results::{ResultSet, ResultValue};
use std::io::ErrorKind;
use std::path::Path;

/// One `name=value` assignment found on a log line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub raw_value: String,
    pub value: ResultValue,
}

/// Scans the solver log for scalar assignments such as `dep_P2=-5.14286E-02;`.
pub struct LogVariableExtractor {
    comment_marker: char,
    statement_separator: char,
}

impl LogVariableExtractor {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            comment_marker: config.comment_marker,
            statement_separator: config.statement_separator,
        }
    }

    /// Reads `log_path` and returns its assignments, later lines overriding
    /// earlier ones. A missing or unreadable log yields an empty set.
    pub fn extract(&self, log_path: &Path, report: &mut ExtractionReport) -> ResultSet {
        let content = match read_lossy(log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No log file at {}", log_path.display());
                return ResultSet::new();
            }
            Err(e) => {
                let message = format!("Failed to read log {}: {}", log_path.display(), e);
                log::warn!("{}", message);
                report.errors.push(message);
                return ResultSet::new();
            }
        };

        report.log_found = true;
        report.bytes_processed += content.len() as u64;

        let variables = self.extract_str(&content);
        report.log_variables = variables.len();
        log::info!(
            "Read {} variables from {}",
            variables.len(),
            log_path.display()
        );

        variables
    }

    pub fn extract_str(&self, content: &str) -> ResultSet {
        let mut variables = ResultSet::new();

        for line in content.split(|c: char| c == '\n' || c == '\r') {
            if let Some(assignment) = self.parse_line(line) {
                if assignment.value == ResultValue::Missing {
                    log::debug!(
                        "Unparseable value '{}' for {}",
                        assignment.raw_value,
                        assignment.name
                    );
                }
                variables.insert(assignment.name, assignment.value);
            }
        }

        variables
    }

    pub fn parse_line(&self, line: &str) -> Option<Assignment> {
        if line.trim_start().starts_with(self.comment_marker) {
            return None;
        }

        let code = line
            .split(self.statement_separator)
            .next()
            .unwrap_or_default();

        find_assignment(code)
    }
}

impl Default for LogVariableExtractor {
    fn default() -> Self {
        Self::new(&SourceConfig::default())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')
}

fn is_literal_char(c: char) -> bool {
    is_word_char(c) || is_value_char(c)
}

/// Finds the first assignment in a statement segment.
///
/// The segment is cut into maximal runs of word characters. The first run
/// directly followed by `=` and at least one value character names the
/// assignment; the value is the longest run of value characters after `=`.
/// When no run qualifies, the first run followed by `=` and any other
/// literal (`c=abc`) is recorded as missing. This also catches keyword
/// settings echoed without the comment marker, so `ELEM=QUA4` yields a
/// missing `ELEM`.
pub fn find_assignment(segment: &str) -> Option<Assignment> {
    if let Some((name, raw_value)) = scan_assignment(segment, is_value_char) {
        return Some(Assignment {
            name: name.to_string(),
            raw_value: raw_value.to_string(),
            value: ResultValue::from_log_literal(raw_value),
        });
    }

    scan_assignment(segment, is_literal_char).map(|(name, raw_value)| Assignment {
        name: name.to_string(),
        raw_value: raw_value.to_string(),
        value: ResultValue::Missing,
    })
}

fn scan_assignment(segment: &str, accepts: fn(char) -> bool) -> Option<(&str, &str)> {
    let mut chars = segment.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !is_word_char(c) {
            continue;
        }

        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if !is_word_char(next) {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }

        let Some(after_eq) = segment[end..].strip_prefix('=') else {
            continue;
        };

        let value_len: usize = after_eq
            .chars()
            .take_while(|&c| accepts(c))
            .map(char::len_utf8)
            .sum();
        if value_len == 0 {
            continue;
        }

        return Some((&segment[start..end], &after_eq[..value_len]));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn extract(content: &str) -> ResultSet {
        LogVariableExtractor::default().extract_str(content)
    }

    #[test]
    fn test_scalar_assignment() {
        let vars = extract("dep_P2=-5.14286E-02;\n");
        assert_eq!(vars.get("dep_P2"), Some(&ResultValue::Scalar(-0.0514286)));
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let vars = extract("$ a=2.0\n   $ b=3.0;\nc=1.0\n");
        assert!(!vars.contains_key("a"));
        assert!(!vars.contains_key("b"));
        assert_eq!(vars.get("c"), Some(&ResultValue::Scalar(1.0)));
    }

    #[test]
    fn test_malformed_value_is_missing() {
        let vars = extract("c=abc\nd=1.-2\ne=E\n");
        assert_eq!(vars.get("c"), Some(&ResultValue::Missing));
        assert_eq!(vars.get("d"), Some(&ResultValue::Missing));
        assert_eq!(vars.get("e"), Some(&ResultValue::Missing));
    }

    #[test]
    fn test_value_characters_only_cover_numeric_literal() {
        let assignment = find_assignment("x=1.5abc").unwrap();
        assert_eq!(assignment.raw_value, "1.5");
        assert_eq!(assignment.value, ResultValue::Scalar(1.5));
    }

    #[test]
    fn test_code_after_separator_is_ignored() {
        let vars = extract("a=1.0; b=2.0\nfoo; c=3.0\n");
        assert_eq!(vars.get("a"), Some(&ResultValue::Scalar(1.0)));
        assert!(!vars.contains_key("b"));
        assert!(!vars.contains_key("c"));
    }

    #[test]
    fn test_first_match_per_line() {
        let vars = extract("result: u=1.0 v=2.0\n");
        assert_eq!(vars.get("u"), Some(&ResultValue::Scalar(1.0)));
        assert!(!vars.contains_key("v"));
    }

    #[test]
    fn test_name_that_fails_is_not_reused() {
        let assignment = find_assignment("a=b=2").unwrap();
        assert_eq!(assignment.name, "b");
        assert_eq!(assignment.value, ResultValue::Scalar(2.0));

        let assignment = find_assignment("n=nan u=1").unwrap();
        assert_eq!(assignment.name, "u");

        let assignment = find_assignment("mode=fast").unwrap();
        assert_eq!(assignment.name, "mode");
        assert_eq!(assignment.raw_value, "fast");
        assert_eq!(assignment.value, ResultValue::Missing);

        let assignment = find_assignment("ELEM=QUA4").unwrap();
        assert_eq!(assignment.name, "ELEM");
        assert_eq!(assignment.value, ResultValue::Missing);

        assert!(find_assignment("abc==1").is_none());
        assert!(find_assignment("x = 1").is_none());
        assert!(find_assignment("").is_none());
    }

    #[test]
    fn test_later_lines_override() {
        let vars = extract("a=1.0\nb=2\na=3.0\n");
        assert_eq!(vars.get("a"), Some(&ResultValue::Scalar(3.0)));
        assert_eq!(vars.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_unicode_names_and_line_endings() {
        let vars = extract("déplacement=1E+00\r\nx=2\ry=3\n");
        assert_eq!(vars.get("déplacement"), Some(&ResultValue::Scalar(1.0)));
        assert_eq!(vars.get("x"), Some(&ResultValue::Scalar(2.0)));
        assert_eq!(vars.get("y"), Some(&ResultValue::Scalar(3.0)));
    }

    #[test]
    fn test_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut report = ExtractionReport::new();

        let vars = LogVariableExtractor::default()
            .extract(&temp_dir.path().join("castem.out"), &mut report);

        assert!(vars.is_empty());
        assert!(!report.log_found);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_unreadable_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("castem.out");
        fs::create_dir(&log_path).unwrap();
        let mut report = ExtractionReport::new();

        let vars = LogVariableExtractor::default().extract(&log_path, &mut report);

        assert!(vars.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_extract_from_file_with_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("castem.out");
        fs::write(&log_path, b"a=1.5;\n\xff\xfe junk\nb=2;\n").unwrap();
        let mut report = ExtractionReport::new();

        let vars = LogVariableExtractor::default().extract(&log_path, &mut report);

        assert_eq!(vars.get("a"), Some(&ResultValue::Scalar(1.5)));
        assert_eq!(vars.get("b"), Some(&ResultValue::Scalar(2.0)));
        assert!(report.log_found);
        assert_eq!(report.log_variables, 2);
    }

    #[test]
    fn test_custom_markers() {
        let config = SourceConfig {
            comment_marker: '#',
            statement_separator: '!',
            ..SourceConfig::default()
        };
        let extractor = LogVariableExtractor::new(&config);

        let vars = extractor.extract_str("# a=1\nb=2 ! c=3\n$ d=4\n");
        assert!(!vars.contains_key("a"));
        assert_eq!(vars.get("b"), Some(&ResultValue::Scalar(2.0)));
        assert_eq!(vars.get("d"), Some(&ResultValue::Scalar(4.0)));
    }
}
