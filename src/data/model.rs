use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Answer text substituted for rows that have none.
pub const NO_ANSWER: &str = "No answer provided.";

// ---------------------------------------------------------------------------
// RawRow – one unnormalized row as read from the source
// ---------------------------------------------------------------------------

/// A row exactly as it came out of the source file, before normalization.
/// `category` is `None` only when the source has no category column; a
/// blank or JSON `null` cell is `Some("")` so it can be forward-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    #[serde(default, deserialize_with = "null_as_blank")]
    pub category: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

/// A present-but-null cell reads as blank; only a missing key stays `None`.
fn null_as_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|c| Some(c.unwrap_or_default()))
}

impl RawRow {
    pub fn new(category: Option<&str>, question: &str, answer: Option<&str>) -> Self {
        Self {
            category: category.map(str::to_string),
            question: question.to_string(),
            answer: answer.map(str::to_string),
        }
    }
}

impl From<&Record> for RawRow {
    fn from(rec: &Record) -> Self {
        Self {
            category: Some(rec.category.clone()),
            question: rec.question.clone(),
            answer: Some(rec.answer.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized question/answer entry
// ---------------------------------------------------------------------------

/// A normalized question/answer entry.
///
/// `category` and `question` are never empty; `ordinal` is the number in front
/// of the first `.` of the question, if there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub category: String,
    pub question: String,
    pub answer: String,
    pub ordinal: Option<i64>,
}

impl Record {
    /// Whether the answer is the placeholder rather than real text.
    pub fn has_answer(&self) -> bool {
        self.answer != NO_ANSWER
    }
}

// ---------------------------------------------------------------------------
// QaDataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// The full normalized record set with a pre-computed category index.
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct QaDataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Number of records per category, sorted by category name.
    category_counts: BTreeMap<String, usize>,
}

impl QaDataset {
    /// Build the category index from normalized records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        for rec in &records {
            *category_counts.entry(rec.category.clone()).or_default() += 1;
        }
        QaDataset {
            records,
            category_counts,
        }
    }

    /// Record count per category over the whole set.
    pub fn category_counts(&self) -> &BTreeMap<String, usize> {
        &self.category_counts
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_counts.keys().map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.category_counts.len()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
