use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::{AppConfig, ResultLayout};
use crate::data::filter::{run_query, CategorySelection, Query, ResultView, SortOrder};
use crate::data::loader::{load_file, LoadError};
use crate::data::model::QaDataset;

// ---------------------------------------------------------------------------
// Status messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user, with optional guidance underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    pub hint: Option<String>,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
            hint: None,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
            hint: None,
        }
    }

    /// Turn a failed load into something a user can act on.
    pub fn from_load_error(err: &LoadError, path: &Path) -> Self {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let (text, hint) = match err {
            LoadError::SourceNotFound { path } => (
                format!("Error: `{}` not found.", path.display()),
                format!(
                    "Please make sure `{file}` is in the directory the explorer is started from, \
                     or set `source_path` in the config file."
                ),
            ),
            LoadError::MalformedSource { .. } | LoadError::Io(_) => (
                format!("An error occurred while processing the file: {err}"),
                format!(
                    "Please ensure `{file}` is a valid CSV with the expected columns: \
                     Category, Question, Answer (or Question, Answer)."
                ),
            ),
        };

        Self {
            level: StatusLevel::Error,
            text,
            hint: Some(hint),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// File the current dataset came from; Reload reads it again.
    pub source_path: PathBuf,

    /// Loaded dataset (None until a load succeeds). Never mutated once loaded.
    pub dataset: Option<Arc<QaDataset>>,

    /// Current category selection, search term and ordering.
    pub query: Query,

    /// Indices of records passing the current query (cached).
    pub visible_indices: Vec<usize>,

    /// Colour per category.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<StatusMessage>,

    pub layout: ResultLayout,

    pub show_chart: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sort = if config.sort_by_ordinal {
            SortOrder::Ordinal
        } else {
            SortOrder::Input
        };
        Self {
            source_path: config.source_path.clone(),
            dataset: None,
            query: Query {
                sort,
                ..Query::default()
            },
            visible_indices: Vec::new(),
            color_map: ColorMap::default(),
            status_message: None,
            layout: config.layout,
            show_chart: config.show_chart,
            config,
        }
    }

    /// Load `path`. On failure the previous dataset and its source path stay
    /// in place and the error becomes the status message.
    pub fn load(&mut self, path: &Path) {
        match load_file(path, &self.config.loader) {
            Ok(dataset) => {
                let text = format!("Loaded {} questions from {}.", dataset.len(), path.display());
                self.source_path = path.to_path_buf();
                self.set_dataset(dataset);
                self.status_message = Some(StatusMessage::info(text));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(StatusMessage::from_load_error(&e, path));
            }
        }
    }

    /// Load the current source file again.
    pub fn reload(&mut self) {
        let path = self.source_path.clone();
        self.load(&path);
    }

    /// Ingest a newly loaded dataset, reset the category filter and colours.
    pub fn set_dataset(&mut self, dataset: QaDataset) {
        self.color_map = ColorMap::new(dataset.categories());
        self.query.categories = CategorySelection::All;
        self.dataset = Some(Arc::new(dataset));
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` after a query change.
    pub fn refilter(&mut self) {
        self.visible_indices = match &self.dataset {
            Some(ds) => run_query(ds, &self.query).into_indices(),
            None => Vec::new(),
        };
    }

    /// The records currently on screen.
    pub fn view(&self) -> Option<ResultView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| ResultView::new(ds, self.visible_indices.as_slice()))
    }

    pub fn set_search(&mut self, term: &str) {
        if self.query.search != term {
            self.query.search = term.to_string();
            self.refilter();
        }
    }

    pub fn set_sort_by_ordinal(&mut self, on: bool) {
        self.query.sort = if on { SortOrder::Ordinal } else { SortOrder::Input };
        self.refilter();
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.query.categories.accepts(category)
    }

    /// Toggle a single category in a multi-select filter.
    pub fn toggle_category(&mut self, category: &str) {
        let Some(ds) = &self.dataset else {
            return;
        };

        let mut selected: BTreeSet<String> = match &self.query.categories {
            CategorySelection::All => ds.categories().map(str::to_string).collect(),
            CategorySelection::Only(set) => set.clone(),
        };
        if !selected.remove(category) {
            selected.insert(category.to_string());
        }

        // Everything ticked again is the same as no constraint.
        self.query.categories = if selected.len() == ds.category_count() {
            CategorySelection::All
        } else {
            CategorySelection::Only(selected)
        };
        self.refilter();
    }

    /// Single-select filter: `None` means all categories.
    pub fn select_category(&mut self, category: Option<&str>) {
        self.query.categories = match category {
            Some(c) => CategorySelection::one(c),
            None => CategorySelection::All,
        };
        self.refilter();
    }

    /// The category chosen in single-select mode, if exactly one is.
    pub fn single_category(&self) -> Option<&str> {
        match &self.query.categories {
            CategorySelection::Only(set) if set.len() == 1 => set.iter().next().map(String::as_str),
            _ => None,
        }
    }

    pub fn select_all(&mut self) {
        self.query.categories = CategorySelection::All;
        self.refilter();
    }

    pub fn select_none(&mut self) {
        self.query.categories = CategorySelection::none();
        self.refilter();
    }

    /// "Displaying N of M total questions."
    pub fn summary(&self) -> Option<String> {
        self.view().map(|view| {
            format!(
                "Displaying {} of {} total questions.",
                view.len(),
                view.total()
            )
        })
    }

    /// Informational message for a loaded dataset whose view is empty.
    pub fn empty_result_message(&self) -> Option<StatusMessage> {
        match &self.dataset {
            Some(_) if self.visible_indices.is_empty() => Some(StatusMessage::warning(
                "No questions match your search criteria.",
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{normalize, LoaderOptions};
    use crate::data::model::RawRow;

    fn state() -> AppState {
        let rows = vec![
            RawRow::new(Some("Core"), "2. What is npm?", None),
            RawRow::new(Some("Core"), "1. What is Node.js?", Some("A runtime.")),
            RawRow::new(Some("Async"), "3. What is the event loop?", Some("It loops.")),
            RawRow::new(Some("Streams"), "What is a stream?", Some("Chunks.")),
        ];
        let mut st = AppState::default();
        st.set_dataset(QaDataset::from_records(normalize(rows, &LoaderOptions::default())));
        st
    }

    fn visible_questions(st: &AppState) -> Vec<String> {
        st.view()
            .map(|v| v.iter().map(|r| r.question.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn new_dataset_shows_everything_sorted() {
        let st = state();
        assert_eq!(
            visible_questions(&st),
            vec![
                "1. What is Node.js?",
                "2. What is npm?",
                "3. What is the event loop?",
                "What is a stream?",
            ]
        );
        assert_eq!(st.summary().as_deref(), Some("Displaying 4 of 4 total questions."));
        assert!(st.empty_result_message().is_none());
    }

    #[test]
    fn unsorted_config_keeps_source_order() {
        let mut st = state();
        st.set_sort_by_ordinal(false);
        assert_eq!(visible_questions(&st)[0], "2. What is npm?");
    }

    #[test]
    fn toggling_categories() {
        let mut st = state();
        st.toggle_category("Core");
        assert!(!st.is_category_selected("Core"));
        assert!(st.is_category_selected("Async"));
        assert_eq!(st.visible_indices.len(), 2);

        st.toggle_category("Core");
        assert_eq!(st.query.categories, CategorySelection::All);
        assert_eq!(st.visible_indices.len(), 4);
    }

    #[test]
    fn none_then_one() {
        let mut st = state();
        st.select_none();
        assert!(st.visible_indices.is_empty());
        assert!(st.empty_result_message().is_some());

        st.toggle_category("Async");
        assert_eq!(visible_questions(&st), vec!["3. What is the event loop?"]);

        st.select_all();
        assert_eq!(st.visible_indices.len(), 4);
    }

    #[test]
    fn single_select_and_search() {
        let mut st = state();
        st.select_category(Some("Core"));
        assert_eq!(st.single_category(), Some("Core"));
        st.set_search("NPM");
        assert_eq!(visible_questions(&st), vec!["2. What is npm?"]);

        st.set_search("nothing like this");
        assert_eq!(
            st.empty_result_message().map(|m| m.level),
            Some(StatusLevel::Warning)
        );

        st.select_category(None);
        st.set_search("");
        assert_eq!(st.single_category(), None);
        assert_eq!(st.visible_indices.len(), 4);
    }

    #[test]
    fn missing_file_keeps_previous_dataset() {
        let mut st = state();
        st.load(Path::new("no/such/dir/index.csv"));
        assert_eq!(st.dataset.as_ref().map(|d| d.len()), Some(4));
        let msg = st.status_message.clone().unwrap();
        assert_eq!(msg.level, StatusLevel::Error);
        assert!(msg.text.contains("not found"), "{}", msg.text);
        assert!(msg.hint.unwrap().contains("index.csv"));
    }

    #[test]
    fn failed_open_keeps_reload_target() {
        let mut st = AppState::default();
        st.load(Path::new("no/such/dir/other.csv"));
        assert_eq!(st.source_path, PathBuf::from("index.csv"));
        assert!(st.status_message.unwrap().text.contains("other.csv"));
    }

    #[test]
    fn missing_file_on_startup() {
        let mut st = AppState::default();
        st.load(Path::new("no/such/dir/index.csv"));
        assert!(st.dataset.is_none());
        assert!(st.view().is_none());
        assert!(st.summary().is_none());
        assert!(st.empty_result_message().is_none());
        assert!(st.status_message.is_some());
    }

    #[test]
    fn malformed_message_names_expected_columns() {
        let err = LoadError::MalformedSource {
            line: Some(4),
            reason: "expected 3 fields but found 5".to_string(),
        };
        let msg = StatusMessage::from_load_error(&err, Path::new("index.csv"));
        assert_eq!(msg.level, StatusLevel::Error);
        assert!(msg.text.contains("line 4"));
        assert!(msg.hint.unwrap().contains("Category, Question, Answer"));
    }
}
