use crate::record::SearchRecord;

/// Split a raw query on whitespace and lowercase each token.
pub fn tokenize_query(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}

/// Conjunctive substring match: every token must occur somewhere in `search_content`,
/// including inside a larger word.
pub fn matches(record: &SearchRecord, tokens: &[String]) -> bool {
    tokens.iter().all(|t| record.search_content.contains(t.as_str()))
}

/// Linear scan preserving index order.
pub fn filter<'a>(records: &'a [SearchRecord], tokens: &[String]) -> Vec<&'a SearchRecord> {
    records.iter().filter(|r| matches(r, tokens)).collect()
}
