use std::borrow::Cow;
use std::collections::BTreeSet;

use super::model::{QaDataset, Record};

// ---------------------------------------------------------------------------
// Query: category selection, search term, ordering
// ---------------------------------------------------------------------------

/// Which categories pass the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    /// No category constraint.
    #[default]
    All,
    /// Only the listed categories. An empty set matches nothing.
    Only(BTreeSet<String>),
}

impl CategorySelection {
    pub fn one(category: impl Into<String>) -> Self {
        CategorySelection::Only(BTreeSet::from([category.into()]))
    }

    pub fn none() -> Self {
        CategorySelection::Only(BTreeSet::new())
    }

    pub fn accepts(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(selected) => selected.contains(category),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CategorySelection::Only(iter.into_iter().map(Into::into).collect())
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Source order.
    #[default]
    Input,
    /// Ascending question number, unnumbered questions last.
    Ordinal,
}

/// Everything the user can change between two renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub categories: CategorySelection,
    /// Case-insensitive substring matched against question and answer.
    pub search: String,
    pub sort: SortOrder,
}

impl Query {
    /// The search term as matched, or `None` when it is empty.
    /// Whitespace is significant: `"this "` does not match `"this."`.
    fn needle(&self) -> Option<String> {
        (!self.search.is_empty()).then(|| self.search.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return indices of records that pass the query, in result order.
///
/// A record passes when:
/// * its category is accepted by `query.categories`, and
/// * the search term is empty, or it occurs (ignoring case) in the question
///   or the answer.
pub fn filtered_indices(dataset: &QaDataset, query: &Query) -> Vec<usize> {
    let needle = query.needle();

    let mut indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| query.categories.accepts(&rec.category))
        .filter(|(_, rec)| match &needle {
            Some(needle) => matches_text(rec, needle),
            None => true,
        })
        .map(|(i, _)| i)
        .collect();

    if query.sort == SortOrder::Ordinal {
        // Stable: equal ordinals keep source order.
        indices.sort_by_key(|&i| {
            let ordinal = dataset.records[i].ordinal;
            (ordinal.is_none(), ordinal)
        });
    }

    indices
}

fn matches_text(rec: &Record, needle: &str) -> bool {
    rec.question.to_lowercase().contains(needle) || rec.answer.to_lowercase().contains(needle)
}

/// Run `query` and borrow the matching records.
pub fn run_query<'a>(dataset: &'a QaDataset, query: &Query) -> ResultView<'a> {
    ResultView::new(dataset, filtered_indices(dataset, query))
}

// ---------------------------------------------------------------------------
// ResultView – matching records without copying them
// ---------------------------------------------------------------------------

/// An ordered selection of records from a dataset.
#[derive(Debug, Clone)]
pub struct ResultView<'a> {
    dataset: &'a QaDataset,
    indices: Cow<'a, [usize]>,
}

impl<'a> ResultView<'a> {
    /// Owned indices from a fresh query, or borrowed ones from a cache.
    pub fn new(dataset: &'a QaDataset, indices: impl Into<Cow<'a, [usize]>>) -> Self {
        Self {
            dataset,
            indices: indices.into(),
        }
    }

    /// Give up the borrow on the dataset, keeping only the positions.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices.into_owned()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Size of the dataset the view was taken from.
    pub fn total(&self) -> usize {
        self.dataset.len()
    }

    pub fn get(&self, pos: usize) -> Option<&'a Record> {
        self.indices.get(pos).map(|&i| &self.dataset.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{normalize, LoaderOptions};
    use crate::data::model::{RawRow, NO_ANSWER};

    fn dataset(rows: &[(&str, &str, &str)]) -> QaDataset {
        let raw = rows
            .iter()
            .map(|&(c, q, a)| RawRow::new(Some(c), q, Some(a)));
        QaDataset::from_records(normalize(raw, &LoaderOptions::default()))
    }

    fn questions(view: &ResultView<'_>) -> Vec<String> {
        view.iter().map(|r| r.question.clone()).collect()
    }

    fn sample() -> QaDataset {
        dataset(&[
            ("Core", "3. What is a module?", "A file."),
            ("Async", "1. What is the event loop?", "The loop that runs callbacks."),
            ("Async", "2. What is a Promise?", "A value that arrives later."),
            ("Core", "Why Node?", "Because the LOOP is fast."),
            ("Streams", "4. What is backpressure?", ""),
        ])
    }

    #[test]
    fn all_categories_and_blank_search_return_everything() {
        let ds = sample();
        let view = run_query(&ds, &Query::default());
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.total(), ds.len());
        assert_eq!(view.get(0).map(|r| r.question.as_str()), Some("3. What is a module?"));
    }

    #[test]
    fn empty_selection_differs_from_all() {
        let ds = sample();
        let none = Query {
            categories: CategorySelection::none(),
            ..Query::default()
        };
        assert!(run_query(&ds, &none).is_empty());
        assert_eq!(run_query(&ds, &Query::default()).len(), 5);
    }

    #[test]
    fn multi_category_selection() {
        let ds = sample();
        let q = Query {
            categories: ["Core", "Streams"].into_iter().collect(),
            ..Query::default()
        };
        let view = run_query(&ds, &q);
        assert_eq!(view.len(), 3);
        assert!(view.iter().all(|r| r.category == "Core" || r.category == "Streams"));
    }

    #[test]
    fn category_and_search_compose() {
        let ds = sample();
        let q = Query {
            categories: CategorySelection::one("Async"),
            search: "loop".to_string(),
            ..Query::default()
        };
        let view = run_query(&ds, &q);
        assert_eq!(questions(&view), vec!["1. What is the event loop?"]);
        assert!(view.iter().all(|r| r.category == "Async"
            && (r.question.to_lowercase().contains("loop")
                || r.answer.to_lowercase().contains("loop"))));
    }

    #[test]
    fn search_is_case_insensitive_over_question_and_answer() {
        let ds = sample();
        let q = Query {
            search: "LoOp".to_string(),
            ..Query::default()
        };
        assert_eq!(
            questions(&run_query(&ds, &q)),
            vec!["1. What is the event loop?", "Why Node?"]
        );
    }

    #[test]
    fn search_term_whitespace_is_significant() {
        let ds = dataset(&[("A", "What is this.", "x"), ("A", "Is this it?", "y")]);
        let q = Query {
            search: "this ".to_string(),
            ..Query::default()
        };
        assert_eq!(questions(&run_query(&ds, &q)), vec!["Is this it?"]);

        let blank = Query {
            search: " ".to_string(),
            ..Query::default()
        };
        assert_eq!(run_query(&ds, &blank).len(), 2);

        let unspaced = dataset(&[("A", "Q", "x")]);
        assert!(run_query(&unspaced, &blank).is_empty());
    }

    #[test]
    fn view_over_cached_indices() {
        let ds = sample();
        let q = Query {
            categories: CategorySelection::one("Async"),
            ..Query::default()
        };
        let cached = run_query(&ds, &q).into_indices();
        assert_eq!(cached, vec![1, 2]);

        let view = ResultView::new(&ds, cached.as_slice());
        assert_eq!(view.len(), 2);
        assert_eq!(view.total(), 5);
        assert_eq!(view.get(1).map(|r| r.question.as_str()), Some("2. What is a Promise?"));
        assert!(view.get(2).is_none());
    }

    #[test]
    fn search_can_hit_the_placeholder() {
        let ds = sample();
        let q = Query {
            search: "no answer".to_string(),
            ..Query::default()
        };
        let view = run_query(&ds, &q);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0).map(|r| r.answer.as_str()), Some(NO_ANSWER));
    }

    #[test]
    fn unmatched_search_is_an_empty_view() {
        let ds = sample();
        let q = Query {
            search: "webassembly".to_string(),
            ..Query::default()
        };
        assert!(run_query(&ds, &q).is_empty());
    }

    #[test]
    fn ordinal_sort_puts_unnumbered_last() {
        let ds = sample();
        let q = Query {
            sort: SortOrder::Ordinal,
            ..Query::default()
        };
        assert_eq!(
            questions(&run_query(&ds, &q)),
            vec![
                "1. What is the event loop?",
                "2. What is a Promise?",
                "3. What is a module?",
                "4. What is backpressure?",
                "Why Node?",
            ]
        );
    }

    #[test]
    fn ordinal_sort_is_stable() {
        let ds = dataset(&[
            ("A", "Unnumbered first", "x"),
            ("A", "2. b", "x"),
            ("A", "1. first one", "x"),
            ("A", "Unnumbered second", "x"),
            ("A", "1. second one", "x"),
        ]);
        let q = Query {
            sort: SortOrder::Ordinal,
            ..Query::default()
        };
        assert_eq!(
            questions(&run_query(&ds, &q)),
            vec![
                "1. first one",
                "1. second one",
                "2. b",
                "Unnumbered first",
                "Unnumbered second",
            ]
        );
    }

    #[test]
    fn query_leaves_dataset_untouched() {
        let ds = sample();
        let before = ds.records.clone();
        let q = Query {
            categories: CategorySelection::one("Core"),
            search: "what".to_string(),
            sort: SortOrder::Ordinal,
        };
        let first = filtered_indices(&ds, &q);
        let second = filtered_indices(&ds, &q);
        assert_eq!(first, second);
        assert_eq!(ds.records, before);
    }

    #[test]
    fn end_to_end_search_for_npm() {
        let text = "Category,Question,Answer\n\
                    Core,1. What is Node.js?,A runtime.\n\
                    Core,2. What is npm?,\n";
        let opts = LoaderOptions::default();
        let rows = crate::data::loader::read_delimited(text.as_bytes(), &opts).unwrap();
        let ds = QaDataset::from_records(normalize(rows, &opts));

        let q = Query {
            categories: CategorySelection::one("Core"),
            search: "npm".to_string(),
            sort: SortOrder::Ordinal,
        };
        let view = run_query(&ds, &q);
        assert_eq!(view.len(), 1);
        let rec = view.get(0).unwrap();
        assert_eq!(rec.question, "2. What is npm?");
        assert_eq!(rec.answer, NO_ANSWER);
        assert_eq!(rec.ordinal, Some(2));
    }
}
