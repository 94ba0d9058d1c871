use search_core::error::{Result, SearchError};
use search_core::extract::build_record;
use search_core::persist::save_index;
use search_core::{SearchIndex, INDEX_FILE};
use serde::Serialize;
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

pub const ARTICLES_DIR: &str = "articles";
pub const URL_PREFIX: &str = "articles";
pub const SEARCH_SCRIPT_TAG: &str = "  <!-- Search Capability -->\n  <script src=\"../js/search.js\"></script>\n";
const SCRIPT_MARKER: &str = "js/search.js";
const BACKUP_MARKER: &str = ".backup";

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub articles: PathBuf,
    pub output: PathBuf,
    pub url_prefix: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            articles: PathBuf::from(ARTICLES_DIR),
            output: PathBuf::from(INDEX_FILE),
            url_prefix: URL_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub indexed: usize,
    pub skipped: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct InjectReport {
    pub injected: Vec<String>,
    pub already_present: Vec<String>,
    pub missing_body: Vec<String>,
}

/// `.html` files directly inside the directory, skipping `*.backup.html` copies.
pub fn is_article(path: &Path) -> bool {
    let is_html = path.extension().and_then(|s| s.to_str()) == Some("html");
    let is_backup = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map_or(false, |stem| stem.ends_with(BACKUP_MARKER));
    is_html && !is_backup
}

/// Eligible article files, sorted by file name so repeated runs agree.
pub fn article_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SearchError::SourceMissing(dir.to_path_buf()));
    }
    let files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        // Symlinked articles are kept; a broken link surfaces as a read failure.
        .filter(|e| !e.file_type().is_dir() && is_article(e.path()))
        .map(|e| e.into_path())
        .collect();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Extract every article into a record and overwrite the artifact at `output`.
/// Only a missing articles directory aborts; unreadable files are logged and skipped.
/// Invalid UTF-8 is decoded lossily so a mis-encoded page is still indexed.
pub fn build_index(opts: &BuildOptions) -> Result<BuildReport> {
    tracing::info!(dir = %opts.articles.display(), "scanning directory");
    let files = article_files(&opts.articles)?;

    let mut report = BuildReport::default();
    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let name = file_name(&path);
        match fs::read(&path) {
            Ok(bytes) => {
                let html = String::from_utf8_lossy(&bytes);
                records.push(build_record(&name, &html, &opts.url_prefix));
                tracing::info!(file = %name, "indexed");
            }
            Err(source) => {
                let err = SearchError::FileIndex { file: name.clone(), source };
                tracing::warn!(error = %err, "skipping file");
                report.skipped.push(name);
            }
        }
    }

    let index = SearchIndex::new(records);
    report.indexed = index.len();
    save_index(&opts.output, &index)?;
    tracing::info!(output = %opts.output.display(), articles = report.indexed, "search index generated");
    Ok(report)
}

/// Add the search script tag before `</body>` in every article that lacks it.
pub fn inject_search(articles: &Path) -> Result<InjectReport> {
    let mut report = InjectReport::default();
    for path in article_files(articles)? {
        let name = file_name(&path);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(source) => {
                let err = SearchError::FileIndex { file: name, source };
                tracing::warn!(error = %err, "skipping file");
                continue;
            }
        };
        if content.contains(SCRIPT_MARKER) {
            tracing::info!(file = %name, "already injected");
            report.already_present.push(name);
        } else if content.contains("</body>") {
            let updated = content.replace("</body>", &format!("{SEARCH_SCRIPT_TAG}</body>"));
            fs::write(&path, updated)?;
            tracing::info!(file = %name, "injected search");
            report.injected.push(name);
        } else {
            tracing::warn!(file = %name, "no </body> found");
            report.missing_body.push(name);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_rules() {
        assert!(is_article(Path::new("a.html")));
        assert!(!is_article(Path::new("a.backup.html")));
        assert!(!is_article(Path::new("a.html.backup")));
        assert!(!is_article(Path::new("notes.md")));
    }
}
