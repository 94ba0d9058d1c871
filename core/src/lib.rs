pub mod engine;
pub mod error;
pub mod extract;
pub mod persist;
pub mod query;
pub mod record;
pub mod widget;

pub use engine::{EngineConfig, EngineState, FileIndexSource, IndexSource, QueryEngine, SearchOutcome};
pub use error::SearchError;
pub use record::{RecordIssue, SearchIndex, SearchRecord};
pub use widget::{Renderer, ResultItem, SearchWidget, UiEvent, View};

/// File name of the generated index artifact, relative to the site root.
pub const INDEX_FILE: &str = "search-index.json";
