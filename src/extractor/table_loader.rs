use crate::config::SourceConfig;
use crate::error::{ExtractError, Result};
use crate::extractor::ExtractionReport;
use crate::results::{parse_float, ResultSet, ResultValue};
use crate::scanner::{ArtifactKind, ArtifactScanner, DataFile};
use std::path::Path;

/// How a column of a table file is named.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKey {
    Header(String),
    /// Position of a column past the end of a short header row.
    Index(usize),
}

/// One numeric column of a headered table file.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: ColumnKey,
    pub values: Vec<f64>,
}

/// What a single table file contributes.
#[derive(Debug, Clone, PartialEq)]
pub enum TableContents {
    Columns(Vec<Column>),
    Table(Vec<Vec<f64>>),
    Empty,
}

/// Loads delimited table artifacts.
///
/// A file whose first cell is not a number has a header row and yields one
/// `Column` per header; otherwise the whole file becomes one `Table` keyed by
/// its stem. Columns or tables holding a non-numeric cell are dropped.
pub struct TableFileLoader {
    scanner: ArtifactScanner,
    delimiter: u8,
}

impl TableFileLoader {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| ExtractError::Config {
                message: format!("Unsupported table delimiter: '{}'", config.delimiter),
            })?;

        Ok(Self {
            scanner: ArtifactScanner::new(config),
            delimiter,
        })
    }

    pub fn extract(&self, directory: &Path, report: &mut ExtractionReport) -> ResultSet {
        match self.scanner.scan_kind(directory, ArtifactKind::Table) {
            Ok(files) => self.extract_files(&files, report),
            Err(e) => {
                let message = format!("Cannot list table files: {}", e);
                log::warn!("{}", message);
                report.errors.push(message);
                ResultSet::new()
            }
        }
    }

    pub fn extract_files(&self, files: &[DataFile], report: &mut ExtractionReport) -> ResultSet {
        let mut values = ResultSet::new();

        for file in files {
            let rows = match self.read_rows(&file.path) {
                Ok(rows) => rows,
                Err(e) => {
                    report.skip_file(format!("Failed to read {}: {}", file.display_path(), e));
                    continue;
                }
            };
            report.record_file(file.size);

            match interpret_rows(&rows, &file.filename, report) {
                TableContents::Columns(columns) => {
                    log::debug!("{}: {} columns", file.filename, columns.len());
                    for column in columns {
                        if let ColumnKey::Header(name) = column.key {
                            values.insert(name, ResultValue::Column(column.values));
                        }
                    }
                }
                TableContents::Table(table) => {
                    log::debug!("{}: {} rows without header", file.filename, table.len());
                    values.insert(file.stem.clone(), ResultValue::Table(table));
                }
                TableContents::Empty => {
                    log::debug!("{}: no rows", file.filename);
                }
            }
        }

        log::info!("Read {} table values", values.len());
        values
    }

    /// Reads the whole file and splits it into rows, dropping rows whose
    /// cells are all blank. Cells are split on the delimiter only; quotes are
    /// ordinary characters. Content that is not valid UTF-8 is an error.
    pub fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>> {
        let bytes = std::fs::read(path)?;
        self.parse_rows(&bytes).map_err(|source| ExtractError::Csv {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse_rows(&self, bytes: &[u8]) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

impl Default for TableFileLoader {
    fn default() -> Self {
        Self {
            scanner: ArtifactScanner::new(&SourceConfig::default()),
            delimiter: b';',
        }
    }
}

/// Turns rows into columns: `columns[c][r]` is cell `c` of row `r`, or
/// `None` where a short row has no such cell.
pub fn transpose(rows: &[Vec<String>]) -> Vec<Vec<Option<&str>>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|c| rows.iter().map(|row| row.get(c).map(String::as_str)).collect())
        .collect()
}

pub fn interpret_rows(
    rows: &[Vec<String>],
    filename: &str,
    report: &mut ExtractionReport,
) -> TableContents {
    let Some(first_cell) = rows.first().and_then(|row| row.first()) else {
        return TableContents::Empty;
    };

    if parse_float(first_cell).is_some() {
        match parse_table(rows) {
            Some(table) => TableContents::Table(table),
            None => {
                report.drop_entry(format!(
                    "Dropping headerless table {}: non-numeric cell",
                    filename
                ));
                TableContents::Empty
            }
        }
    } else {
        TableContents::Columns(parse_columns(rows, filename, report))
    }
}

fn parse_table(rows: &[Vec<String>]) -> Option<Vec<Vec<f64>>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| parse_float(cell)).collect::<Option<Vec<f64>>>())
        .collect()
}

fn parse_columns(rows: &[Vec<String>], filename: &str, report: &mut ExtractionReport) -> Vec<Column> {
    let mut columns = Vec::new();

    for (c, cells) in transpose(rows).into_iter().enumerate() {
        // A blank header cell is still a key; only a missing one is not.
        let key = match cells.first().copied().flatten() {
            Some(header) => ColumnKey::Header(header.to_string()),
            None => ColumnKey::Index(c),
        };

        let values: Option<Vec<f64>> = cells[1..]
            .iter()
            .flatten()
            .filter(|cell| !cell.trim().is_empty())
            .map(|cell| parse_float(cell))
            .collect();

        match (key, values) {
            (ColumnKey::Index(c), _) => {
                report.drop_entry(format!("Dropping column {} of {}: no header", c, filename));
            }
            (ColumnKey::Header(name), None) => {
                report.drop_entry(format!(
                    "Dropping column '{}' of {}: non-numeric cell",
                    name, filename
                ));
            }
            (key, Some(values)) => columns.push(Column { key, values }),
        }
    }

    columns
}
