use std::time::{Duration, Instant};

/// Per-run statistics and the per-file errors that were recovered from.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub log_found: bool,
    pub log_variables: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub entries_dropped: usize,
    pub bytes_processed: u64,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ExtractionReport {
    pub fn new() -> Self {
        Self {
            log_found: false,
            log_variables: 0,
            files_processed: 0,
            files_skipped: 0,
            entries_dropped: 0,
            bytes_processed: 0,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn record_file(&mut self, bytes: u64) {
        self.files_processed += 1;
        self.bytes_processed += bytes;
    }

    /// Records a file whose whole contribution was omitted because it could
    /// not be read or parsed.
    pub fn skip_file<S: Into<String>>(&mut self, error: S) {
        let error = error.into();
        log::warn!("{}", error);
        self.files_skipped += 1;
        self.errors.push(error);
    }

    /// Records a column or table dropped for holding non-numeric cells.
    pub fn drop_entry<S: AsRef<str>>(&mut self, reason: S) {
        log::debug!("{}", reason.as_ref());
        self.entries_dropped += 1;
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Extraction summary:\n  Log file: {}\n  Log variables: {}\n  Files read: {}\n  Bytes read: {}\n",
            if self.log_found { "found" } else { "absent" },
            self.log_variables,
            self.files_processed,
            self.bytes_processed
        );

        if self.files_skipped > 0 {
            summary.push_str(&format!("  Files skipped: {}\n", self.files_skipped));
        }

        if self.entries_dropped > 0 {
            summary.push_str(&format!(
                "  Non-numeric columns/tables dropped: {}\n",
                self.entries_dropped
            ));
        }

        summary
    }
}

impl Default for ExtractionReport {
    fn default() -> Self {
        Self::new()
    }
}
