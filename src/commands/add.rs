//! Add command implementation

use crate::config::Settings;
use crate::error::Result;
use crate::index::PaperIndex;
use crate::store::{IndexStore, IngestStats};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Ingest all unseen `.pdf` files from `paper_dir` into the store at
/// `store_path` and persist it.
pub async fn cmd_add(
    settings: &Settings,
    store_path: &Path,
    paper_dir: &Path,
) -> Result<IngestStats> {
    let mut store = IndexStore::<PaperIndex>::open(store_path);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Adding documents from {}...", paper_dir.display()));

    let result = store.ingest_directory(paper_dir, settings).await;
    spinner.finish_and_clear();

    result
}

/// Print ingestion statistics to the console
pub fn print_ingest_stats(stats: &IngestStats) {
    println!("✓ Ingestion complete");
    println!("  Documents added: {}", stats.docs_added);
    println!("  Already indexed: {}", stats.docs_skipped);
    if stats.files_ignored > 0 {
        println!("  Non-PDF files ignored: {}", stats.files_ignored);
    }
}
