use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use reqwest::{Client, Url};
use search_core::error::SearchError;
use search_core::{EngineConfig, IndexSource, QueryEngine, Renderer, SearchWidget, UiEvent, View};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Search a published blog from the terminal")]
struct Cli {
    /// Site root URL serving search-index.json
    #[arg(long, default_value = "http://localhost:8080/")]
    site: String,
    /// Path of the page the search is opened from; article pages resolve the index via ../
    #[arg(long, default_value = "/")]
    page: String,
    /// Run a single query once the index is loaded, print the results and exit
    #[arg(long)]
    query: Option<String>,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
}

/// Fetches the index relative to the current page URL.
struct HttpIndexSource {
    client: Client,
    page_url: Url,
}

#[async_trait]
impl IndexSource for HttpIndexSource {
    async fn fetch(&self, location: &str) -> search_core::error::Result<Vec<u8>> {
        let url = self
            .page_url
            .join(location)
            .map_err(|e| SearchError::IndexUnavailable(format!("{location}: {e}")))?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SearchError::IndexUnavailable(format!("{url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(SearchError::IndexUnavailable(format!("{url}: {}", resp.status())));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SearchError::IndexUnavailable(format!("{url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn set_visible(&mut self, visible: bool) {
        println!("{}", if visible { "[search open]" } else { "[search closed]" });
    }

    fn render(&mut self, view: &View) {
        match view {
            View::Placeholder => println!("何かお探しですか？"),
            View::Loading => println!("データを読み込み中..."),
            View::NoResults => println!("検索結果が見つかりませんでした。"),
            View::Results(items) => {
                for item in items {
                    println!("{}\n  {}\n  {}", item.title, item.excerpt, item.href);
                    if !item.tags.is_empty() {
                        println!("  [{}]", item.tags.join("] ["));
                    }
                }
            }
        }
    }
}

fn parse_event(line: &str) -> Option<UiEvent> {
    match line.trim_end_matches(['\r', '\n']) {
        ":quit" => None,
        ":open" => Some(UiEvent::ToggleClicked),
        ":close" => Some(UiEvent::CloseClicked),
        ":esc" => Some(UiEvent::Escape),
        text => Some(UiEvent::Input(text.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Cli::parse();

    let mut site = args.site.clone();
    if !site.ends_with('/') {
        site.push('/');
    }
    let site = Url::parse(&site)?;
    let page_url = site.join(args.page.trim_start_matches('/'))?;
    let client = Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let source = HttpIndexSource { client, page_url };
    let engine = Arc::new(QueryEngine::new(EngineConfig::for_page(&args.page)));

    if let Some(q) = args.query {
        engine.load(&source).await;
        let mut widget = SearchWidget::new(engine, TerminalRenderer);
        widget.input(&q);
        return Ok(());
    }

    // Keep the prompt responsive while the index downloads.
    let loader = engine.clone();
    tokio::spawn(async move {
        let state = loader.load(&source).await;
        tracing::info!(?state, "index load finished");
    });

    let mut widget = SearchWidget::new(engine, TerminalRenderer);
    widget.open();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_event(&line) {
            Some(event) => widget.handle(event),
            None => break,
        }
    }
    Ok(())
}
