//! Query command implementation

use crate::answer::Answer;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::index::{DocumentIndex, PaperIndex};
use crate::store::IndexStore;
use std::path::Path;
use tracing::info;

/// Load the store at `store_path` and forward one question to its index.
///
/// Unlike ingestion, querying requires an existing store: there is nothing
/// useful to ask an index that was never built.
pub async fn cmd_query(settings: &Settings, store_path: &Path, question: &str) -> Result<Answer> {
    if !IndexStore::<PaperIndex>::exists(store_path) {
        return Err(Error::IndexNotFound(store_path.to_path_buf()));
    }

    let store = IndexStore::<PaperIndex>::open(store_path);
    info!("Querying: {}", question);
    store.index.query(question, settings).await
}
