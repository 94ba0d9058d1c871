use crate::error::{Result, SearchError};
use crate::persist::parse_index;
use crate::query::{filter, tokenize_query};
use crate::record::{SearchIndex, SearchRecord};
use crate::INDEX_FILE;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Directory that holds article pages. Pages below it reach the site root via `../`.
pub const ARTICLES_SEGMENT: &str = "/articles/";

/// Where the index artifact and record urls resolve from, relative to the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub base_path: String,
    pub index_file: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { base_path: String::new(), index_file: INDEX_FILE.to_string() }
    }
}

impl EngineConfig {
    pub fn with_base(base_path: impl Into<String>) -> Self {
        Self { base_path: base_path.into(), ..Self::default() }
    }

    /// Config for a page at `page_path`: article pages sit one level below the root.
    pub fn for_page(page_path: &str) -> Self {
        if page_path.contains(ARTICLES_SEGMENT) {
            Self::with_base("../")
        } else {
            Self::default()
        }
    }

    pub fn index_location(&self) -> String {
        format!("{}{}", self.base_path, self.index_file)
    }

    pub fn link_for(&self, record: &SearchRecord) -> String {
        format!("{}{}", self.base_path, record.url)
    }
}

/// Fetch primitive used to obtain the raw index body.
#[async_trait]
pub trait IndexSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Reads the artifact from disk, resolving locations against `root`.
pub struct FileIndexSource {
    root: PathBuf,
}

impl FileIndexSource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

#[async_trait]
impl IndexSource for FileIndexSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.root.join(location);
        tokio::fs::read(&path)
            .await
            .map_err(|e| SearchError::IndexUnavailable(format!("{}: {e}", path.display())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Loading,
    Loaded,
    LoadFailed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// Blank query.
    Placeholder,
    /// Index not available (still loading, or the load failed).
    NotLoaded,
    /// Matching records in index order. May be empty.
    Matches(Vec<&'a SearchRecord>),
}

/// Holds the index for one page lifetime. The index is set at most once and is
/// read-only afterwards, so searches never contend with the load.
pub struct QueryEngine {
    config: EngineConfig,
    started: AtomicBool,
    index: OnceLock<Option<SearchIndex>>,
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, started: AtomicBool::new(false), index: OnceLock::new() }
    }

    /// Engine that starts out loaded with `index`.
    pub fn with_index(config: EngineConfig, index: SearchIndex) -> Self {
        let engine = Self::new(config);
        engine.started.store(true, Ordering::SeqCst);
        let _ = engine.index.set(Some(index.normalized()));
        engine
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn state(&self) -> EngineState {
        match self.index.get() {
            Some(Some(_)) => EngineState::Loaded,
            Some(None) => EngineState::LoadFailed,
            None if self.started.load(Ordering::SeqCst) => EngineState::Loading,
            None => EngineState::Uninitialized,
        }
    }

    pub fn index(&self) -> Option<&SearchIndex> {
        self.index.get().and_then(|i| i.as_ref())
    }

    /// Fetch and parse the index once. Failures are logged and leave the engine in
    /// `LoadFailed`; there is no retry, later calls just report the current state.
    pub async fn load(&self, source: &dyn IndexSource) -> EngineState {
        if self.started.swap(true, Ordering::SeqCst) {
            return self.state();
        }
        let location = self.config.index_location();
        tracing::debug!(%location, "loading search index");
        let loaded = match source.fetch(&location).await.and_then(|body| parse_index(&body)) {
            Ok(index) => {
                tracing::info!(%location, records = index.len(), "search index loaded");
                Some(index.normalized())
            }
            Err(err) => {
                tracing::error!(%location, error = %err, "failed to load search index");
                None
            }
        };
        let _ = self.index.set(loaded);
        self.state()
    }

    pub fn search(&self, query: &str) -> SearchOutcome<'_> {
        let tokens = tokenize_query(query);
        if tokens.is_empty() {
            return SearchOutcome::Placeholder;
        }
        match self.index() {
            Some(index) => SearchOutcome::Matches(filter(index.records(), &tokens)),
            None => SearchOutcome::NotLoaded,
        }
    }
}
