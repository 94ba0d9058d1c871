use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref MARKUP: Regex = Regex::new(r"<[^>]+>").expect("valid regex");
}

/// One article's searchable representation, as stored in the index artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    /// Lowercased title, excerpt, tags and body text. The only field matched against.
    pub search_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordIssue {
    SearchContentNotLowercase,
    SearchContentHasMarkup,
    UrlAbsolute,
}

impl SearchRecord {
    pub fn validate(&self) -> Vec<RecordIssue> {
        let mut issues = Vec::new();
        if self.search_content != self.search_content.to_lowercase() {
            issues.push(RecordIssue::SearchContentNotLowercase);
        }
        if MARKUP.is_match(&self.search_content) {
            issues.push(RecordIssue::SearchContentHasMarkup);
        }
        if self.url.starts_with('/') || self.url.contains("://") {
            issues.push(RecordIssue::UrlAbsolute);
        }
        issues
    }
}

/// Ordered collection of records in scan order. Duplicate urls are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex(pub Vec<SearchRecord>);

impl SearchIndex {
    pub fn new(records: Vec<SearchRecord>) -> Self { Self(records) }

    pub fn records(&self) -> &[SearchRecord] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Repair what can be repaired after loading a possibly hand-edited artifact.
    /// Records are never dropped; every issue is logged.
    pub fn normalized(mut self) -> Self {
        for record in self.0.iter_mut() {
            for issue in record.validate() {
                tracing::warn!(url = %record.url, ?issue, "index record failed validation");
                if issue == RecordIssue::SearchContentNotLowercase {
                    record.search_content = record.search_content.to_lowercase();
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(search_content: &str, url: &str) -> SearchRecord {
        SearchRecord {
            title: "T".into(),
            excerpt: String::new(),
            tags: vec![],
            url: url.into(),
            search_content: search_content.into(),
        }
    }

    #[test]
    fn clean_record_has_no_issues() {
        assert!(record("intro to ai", "articles/a.html").validate().is_empty());
    }

    #[test]
    fn flags_uppercase_markup_and_absolute_urls() {
        let r = record("Intro <b>AI</b>", "/articles/a.html");
        let issues = r.validate();
        assert!(issues.contains(&RecordIssue::SearchContentNotLowercase));
        assert!(issues.contains(&RecordIssue::SearchContentHasMarkup));
        assert!(issues.contains(&RecordIssue::UrlAbsolute));
    }

    #[test]
    fn normalized_lowercases_without_dropping() {
        let index = SearchIndex::new(vec![record("Mixed Case", "articles/a.html"), record("ok", "articles/a.html")]);
        let index = index.normalized();
        assert_eq!(index.len(), 2);
        assert_eq!(index.records()[0].search_content, "mixed case");
    }

    #[test]
    fn deserializes_sparse_records() {
        let json = r#"[{"title":"A","url":"articles/a.html","searchContent":"a","extra":1}]"#;
        let index: SearchIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.records()[0].tags, Vec::<String>::new());
        assert_eq!(index.records()[0].excerpt, "");
    }
}
