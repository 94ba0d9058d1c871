use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer::{build_index, inject_search, BuildOptions, ARTICLES_DIR, URL_PREFIX};
use search_core::INDEX_FILE;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Generate the blog search index from article pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build search-index.json from the articles directory (the default)
    Build {
        /// Directory containing article pages
        #[arg(long, default_value = ARTICLES_DIR)]
        articles: PathBuf,
        /// Output index file
        #[arg(long, default_value = INDEX_FILE)]
        output: PathBuf,
        /// Prefix joined with each file name to form the record url
        #[arg(long, default_value = URL_PREFIX)]
        url_prefix: String,
    },
    /// Insert the search script tag into article pages that lack it
    Inject {
        #[arg(long, default_value = ARTICLES_DIR)]
        articles: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        None => {
            let report = build_index(&BuildOptions::default())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::Build { articles, output, url_prefix }) => {
            let report = build_index(&BuildOptions { articles, output, url_prefix })?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::Inject { articles }) => {
            let report = inject_search(&articles)?;
            tracing::info!(
                injected = report.injected.len(),
                already_present = report.already_present.len(),
                missing_body = report.missing_body.len(),
                "inject complete"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
