use indexer::{build_index, inject_search, BuildOptions, SEARCH_SCRIPT_TAG};
use search_core::error::SearchError;
use search_core::persist::load_index;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const FULL_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<article>
  <h1 class="article-title">Intro to AI</h1>
  <p class="article-excerpt">A primer</p>
  <div class="tags"><span class="tag">ai</span><span class="tag">intro</span></div>
  <div class="content">
    <p>Body text here</p>
  </div>
</article>
</body></html>
"#;

fn opts(root: &Path) -> BuildOptions {
    BuildOptions {
        articles: root.join("articles"),
        output: root.join("search-index.json"),
        url_prefix: "articles".into(),
    }
}

fn write_article(root: &Path, name: &str, html: &str) {
    fs::create_dir_all(root.join("articles")).unwrap();
    fs::write(root.join("articles").join(name), html).unwrap();
}

#[test]
fn missing_directory_aborts_without_output() {
    let dir = tempdir().unwrap();
    let err = build_index(&opts(dir.path())).unwrap_err();
    assert!(matches!(err, SearchError::SourceMissing(_)));
    assert!(!dir.path().join("search-index.json").exists());
}

#[test]
fn empty_directory_writes_empty_array() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("articles")).unwrap();
    let report = build_index(&opts(dir.path())).unwrap();
    assert_eq!(report.indexed, 0);
    assert_eq!(fs::read_to_string(dir.path().join("search-index.json")).unwrap(), "[]");
}

#[test]
fn builds_records_in_file_name_order() {
    let dir = tempdir().unwrap();
    write_article(dir.path(), "b-post.html", FULL_PAGE);
    write_article(dir.path(), "a-post.html", "<p>nothing</p>");
    write_article(dir.path(), "a-post.backup.html", FULL_PAGE);
    write_article(dir.path(), "notes.txt", FULL_PAGE);

    build_index(&opts(dir.path())).unwrap();
    let index = load_index(&dir.path().join("search-index.json")).unwrap();
    let urls: Vec<&str> = index.records().iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["articles/a-post.html", "articles/b-post.html"]);

    let full = &index.records()[1];
    assert_eq!(full.title, "Intro to AI");
    assert_eq!(full.excerpt, "A primer");
    assert_eq!(full.tags, vec!["ai", "intro"]);
    assert_eq!(full.search_content, "intro to ai a primer ai intro body text here");
    assert!(index.records().iter().all(|r| r.validate().is_empty()));
}

#[test]
fn fallback_record_for_bare_page() {
    let dir = tempdir().unwrap();
    let body = "Lorem ipsum dolor sit amet ".repeat(10);
    write_article(
        dir.path(),
        "my-cool-post.html",
        &format!("<article><div class=\"content\"><p>{body}</p></div></article>"),
    );
    build_index(&opts(dir.path())).unwrap();
    let index = load_index(&dir.path().join("search-index.json")).unwrap();
    let r = &index.records()[0];
    assert_eq!(r.title, "my cool post");
    assert!(r.tags.is_empty());
    let expected: String = body.trim().chars().take(150).collect();
    assert_eq!(r.excerpt, format!("{expected}..."));
}

#[test]
fn rebuild_is_byte_identical() {
    let dir = tempdir().unwrap();
    write_article(dir.path(), "one.html", FULL_PAGE);
    write_article(dir.path(), "two.html", "<h1 class=\"article-title\">Two</h1>");
    let out = dir.path().join("search-index.json");

    build_index(&opts(dir.path())).unwrap();
    let first = fs::read(&out).unwrap();
    build_index(&opts(dir.path())).unwrap();
    assert_eq!(first, fs::read(&out).unwrap());
}

#[test]
#[cfg(unix)]
fn unreadable_file_is_skipped() {
    let dir = tempdir().unwrap();
    write_article(dir.path(), "good.html", FULL_PAGE);
    std::os::unix::fs::symlink(dir.path().join("missing.html"), dir.path().join("articles/broken.html")).unwrap();

    let report = build_index(&opts(dir.path())).unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(report.skipped, vec!["broken.html"]);
}

#[test]
fn mis_encoded_article_is_still_indexed() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("articles")).unwrap();
    let mut page = b"<h1 class=\"article-title\">Caf".to_vec();
    page.push(0xe9);
    page.extend_from_slice(b" notes</h1><article><div class=\"content\">latin one body</div></article>");
    fs::write(dir.path().join("articles/cafe.html"), page).unwrap();

    let report = build_index(&opts(dir.path())).unwrap();
    assert_eq!(report.indexed, 1);
    assert!(report.skipped.is_empty());
    let index = load_index(&dir.path().join("search-index.json")).unwrap();
    let r = &index.records()[0];
    assert_eq!(r.title, "Caf\u{fffd} notes");
    assert!(r.search_content.contains("latin one body"));
}

#[test]
fn inject_adds_tag_once() {
    let dir = tempdir().unwrap();
    write_article(dir.path(), "a.html", "<html><body><p>x</p></body></html>");
    write_article(dir.path(), "b.html", "<p>fragment</p>");
    let articles = dir.path().join("articles");

    let report = inject_search(&articles).unwrap();
    assert_eq!(report.injected, vec!["a.html"]);
    assert_eq!(report.missing_body, vec!["b.html"]);
    let page = fs::read_to_string(articles.join("a.html")).unwrap();
    assert!(page.contains(&format!("{SEARCH_SCRIPT_TAG}</body>")));

    let again = inject_search(&articles).unwrap();
    assert!(again.injected.is_empty());
    assert_eq!(again.already_present, vec!["a.html"]);
}
