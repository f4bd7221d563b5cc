use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{QaDataset, RawRow, Record, NO_ANSWER};

/// Category used when the source has no category column.
pub const DEFAULT_CATEGORY: &str = "General";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source file not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("malformed source{}: {reason}", at_line(.line))]
    MalformedSource { line: Option<u64>, reason: String },

    #[error("reading source: {0}")]
    Io(#[from] io::Error),
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl LoadError {
    fn malformed(line: Option<u64>, reason: impl Into<String>) -> Self {
        LoadError::MalformedSource {
            line,
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line());
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(e) => LoadError::Io(e),
            csv::ErrorKind::UnequalLengths {
                expected_len, len, ..
            } => LoadError::malformed(
                line,
                format!("expected {expected_len} fields but found {len}"),
            ),
            _ => LoadError::malformed(line, reason),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return LoadError::Io(err.into());
        }
        LoadError::malformed(Some(err.line() as u64), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Number of fields per row: `question, answer` or `category, question, answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ColumnCount {
    Two,
    Three,
}

impl ColumnCount {
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            2 => Some(ColumnCount::Two),
            3 => Some(ColumnCount::Three),
            _ => None,
        }
    }

    pub fn fields(self) -> usize {
        match self {
            ColumnCount::Two => 2,
            ColumnCount::Three => 3,
        }
    }
}

impl TryFrom<u8> for ColumnCount {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        ColumnCount::from_len(n as usize)
            .ok_or_else(|| format!("column_count must be 2 or 3, got {n}"))
    }
}

impl From<ColumnCount> for u8 {
    fn from(c: ColumnCount) -> u8 {
        c.fields() as u8
    }
}

/// Knobs for reading and normalizing a source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// First row holds column names rather than data.
    pub has_header: bool,
    /// Expected arity; `None` detects it from the header or first row.
    pub column_count: Option<ColumnCount>,
    /// Blank category cells inherit the previous row's category.
    pub fill_category_forward: bool,
    /// Category for two-column sources and for blank cells with nothing to inherit.
    pub implicit_category: String,
    /// Field delimiter; `None` picks one from the file extension.
    pub delimiter: Option<char>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            column_count: None,
            fill_category_forward: true,
            implicit_category: DEFAULT_CATEGORY.to_string(),
            delimiter: None,
        }
    }
}

impl LoaderOptions {
    fn implicit_category(&self) -> &str {
        match self.implicit_category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        }
    }

    fn delimiter_byte(&self) -> Result<u8, LoadError> {
        let c = self.delimiter.unwrap_or(',');
        u8::try_from(c)
            .map_err(|_| LoadError::malformed(None, format!("delimiter {c:?} is not a single byte")))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize a question set from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` (and anything unrecognised) – comma-delimited rows
/// * `.tsv` / `.tab`                     – tab-delimited rows
/// * `.json` – `[{ "category": "...", "question": "...", "answer": "..." }, ...]`
pub fn load_file(path: &Path, opts: &LoaderOptions) -> Result<QaDataset, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io(e),
    })?;
    let reader = BufReader::new(file);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "json" => read_json(reader)?,
        "tsv" | "tab" => {
            let opts = LoaderOptions {
                delimiter: Some(opts.delimiter.unwrap_or('\t')),
                ..opts.clone()
            };
            read_delimited(reader, &opts)?
        }
        _ => read_delimited(reader, opts)?,
    };

    let dataset = QaDataset::from_records(normalize(rows, opts));
    log::info!(
        "Loaded {} questions in {} categories from {}",
        dataset.len(),
        dataset.category_count(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited reader
// ---------------------------------------------------------------------------

/// Split delimited text into raw rows.
///
/// The arity comes from the header (when present) or the first data row and
/// must be 2 or 3; every following row must have the same number of fields.
pub fn read_delimited<R: Read>(reader: R, opts: &LoaderOptions) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(opts.has_header)
        .delimiter(opts.delimiter_byte()?)
        .from_reader(reader);

    let mut arity = None;
    if opts.has_header {
        let headers = reader.headers()?;
        if !headers.is_empty() {
            arity = Some(check_arity(headers.len(), Some(1), opts)?);
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line());
        let columns = match arity {
            Some(columns) => columns,
            None => {
                let detected = check_arity(record.len(), line, opts)?;
                arity = Some(detected);
                detected
            }
        };

        let field = |i: usize| record.get(i).unwrap_or("");
        let row = match columns {
            ColumnCount::Two => RawRow::new(None, field(0), Some(field(1))),
            ColumnCount::Three => RawRow::new(Some(field(0)), field(1), Some(field(2))),
        };
        rows.push(row);
    }

    Ok(rows)
}

fn check_arity(len: usize, line: Option<u64>, opts: &LoaderOptions) -> Result<ColumnCount, LoadError> {
    let detected = ColumnCount::from_len(len)
        .ok_or_else(|| LoadError::malformed(line, format!("expected 2 or 3 fields, found {len}")))?;
    match opts.column_count {
        Some(expected) if expected != detected => Err(LoadError::malformed(
            line,
            format!(
                "configured for {} columns but the source has {}",
                expected.fields(),
                detected.fields()
            ),
        )),
        _ => Ok(detected),
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "category": "Core", "question": "1. What is Node.js?", "answer": "A runtime." },
///   { "question": "2. What is npm?" }
/// ]
/// ```
///
/// A missing `category` key is treated like a two-column row.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawRow>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turn raw rows into records.
///
/// Trims every field, forward-fills blank categories, substitutes the
/// placeholder for blank answers, parses ordinals and drops rows whose
/// question is blank. Running it over its own output changes nothing.
pub fn normalize<I>(rows: I, opts: &LoaderOptions) -> Vec<Record>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut last_category: Option<String> = None;
    let mut records = Vec::new();

    for (row_no, row) in rows.into_iter().enumerate() {
        // Resolve the category before dropping anything so a label on a
        // question-less row still carries down to the rows below it.
        let category = match row.category.as_deref().map(str::trim) {
            None => opts.implicit_category().to_string(),
            Some(c) if !c.is_empty() => {
                last_category = Some(c.to_string());
                c.to_string()
            }
            Some(_) => match (&last_category, opts.fill_category_forward) {
                (Some(prev), true) => prev.clone(),
                _ => {
                    log::warn!(
                        "Row {row_no}: blank category, using {:?}",
                        opts.implicit_category()
                    );
                    opts.implicit_category().to_string()
                }
            },
        };

        let question = row.question.trim();
        if question.is_empty() {
            log::debug!("Row {row_no}: dropped, question is blank");
            continue;
        }

        let answer = row
            .answer
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(NO_ANSWER);

        let ordinal = parse_ordinal(question);
        if ordinal.is_none() {
            log::debug!("Row {row_no}: no ordinal in {question:?}");
        }

        records.push(Record {
            category,
            question: question.to_string(),
            answer: answer.to_string(),
            ordinal,
        });
    }

    records
}

/// The integer before the first `.` of a question, e.g. `12` for
/// `"12. What is npm?"`.
pub fn parse_ordinal(question: &str) -> Option<i64> {
    question.split('.').next()?.trim().parse().ok()
}
