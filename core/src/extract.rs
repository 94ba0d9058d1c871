use crate::record::SearchRecord;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// Number of body characters used when an article has no explicit excerpt.
pub const EXCERPT_FALLBACK_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

lazy_static! {
    static ref TITLE: Regex = Regex::new(r#"<h1 class="article-title">(.*?)</h1>"#).expect("valid regex");
    static ref EXCERPT: Regex = Regex::new(r#"<p class="article-excerpt">(.*?)</p>"#).expect("valid regex");
    static ref TAG: Regex = Regex::new(r#"<span class="tag">(.*?)</span>"#).expect("valid regex");
    static ref CONTENT: Regex = Regex::new(r#"(?s)<div class="content">(.*?)</article>"#).expect("valid regex");
    static ref SCRIPT: Regex = Regex::new(r"(?is)<script.*?</script>").expect("valid regex");
    static ref STYLE: Regex = Regex::new(r"(?is)<style.*?</style>").expect("valid regex");
    static ref MARKUP: Regex = Regex::new(r"<[^>]+>").expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Raw fields pulled out of an article page. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub body: String,
}

fn first_capture(re: &Regex, html: &str) -> String {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Extract title, excerpt, tags and body text. Never fails; malformed markup
/// just yields empty fields.
pub fn extract_fields(html: &str) -> ExtractedFields {
    let tags = TAG
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();
    let body = CONTENT
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| clean_body(m.as_str()))
        .unwrap_or_default();
    ExtractedFields {
        title: first_capture(&TITLE, html),
        excerpt: first_capture(&EXCERPT, html),
        tags,
        body,
    }
}

/// Drop script/style blocks, replace remaining tags with spaces and collapse whitespace.
pub fn clean_body(markup: &str) -> String {
    let without_scripts = SCRIPT.replace_all(markup, "");
    let without_styles = STYLE.replace_all(&without_scripts, "");
    plain_text(&without_styles)
}

/// Replace tags with spaces, collapse whitespace runs and trim.
pub fn plain_text(markup: &str) -> String {
    let stripped = MARKUP.replace_all(markup, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Title used when the page has no heading: the file stem with hyphens as spaces.
pub fn slug_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    stem.replace('-', " ")
}

pub fn fallback_excerpt(body: &str) -> String {
    let mut excerpt: String = body.chars().take(EXCERPT_FALLBACK_CHARS).collect();
    excerpt.push_str(ELLIPSIS);
    excerpt
}

/// Build the index record for one article page.
pub fn build_record(file_name: &str, html: &str, url_prefix: &str) -> SearchRecord {
    let fields = extract_fields(html);
    let title = if fields.title.is_empty() { slug_title(file_name) } else { fields.title };
    let excerpt = if fields.excerpt.is_empty() { fallback_excerpt(&fields.body) } else { fields.excerpt };

    let tag_text = fields.tags.iter().map(|t| plain_text(t)).collect::<Vec<_>>().join(" ");
    let search_content = format!(
        "{} {} {} {}",
        plain_text(&title),
        plain_text(&excerpt),
        tag_text,
        fields.body
    )
    .to_lowercase();

    let prefix = url_prefix.trim_end_matches('/');
    let url = if prefix.is_empty() { file_name.to_string() } else { format!("{prefix}/{file_name}") };

    SearchRecord { title, excerpt, tags: fields.tags, url, search_content }
}
