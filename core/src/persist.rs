use crate::error::Result;
use crate::record::SearchIndex;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

/// Write the whole index as pretty-printed JSON, replacing any previous artifact.
pub fn save_index(path: &Path, index: &SearchIndex) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(index)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn parse_index(bytes: &[u8]) -> Result<SearchIndex> {
    let index: SearchIndex = serde_json::from_slice(bytes)?;
    Ok(index)
}

pub fn load_index(path: &Path) -> Result<SearchIndex> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    parse_index(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SearchRecord;
    use tempfile::tempdir;

    #[test]
    fn saves_pretty_json_with_camel_case_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/search-index.json");
        let index = SearchIndex::new(vec![SearchRecord {
            title: "Intro".into(),
            excerpt: "A primer".into(),
            tags: vec!["ai".into()],
            url: "articles/a.html".into(),
            search_content: "intro a primer ai".into(),
        }]);
        save_index(&path, &index).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"title\": \"Intro\""));
        assert!(text.contains("\"searchContent\": \"intro a primer ai\""));
        assert_eq!(load_index(&path).unwrap(), index);
    }

    #[test]
    fn rejects_non_array_body() {
        assert!(parse_index(b"{\"title\":\"x\"}").is_err());
        assert!(parse_index(b"<html>404</html>").is_err());
    }
}
