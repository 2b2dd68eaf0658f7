//! The retrieval index capability
//!
//! [`DocumentIndex`] is the narrow interface the index store persists and
//! drives: ingest one document, answer one question. [`PaperIndex`] is the
//! built-in implementation (chunk, embed, cosine retrieval, LLM synthesis).

mod paper_index;

pub use paper_index::*;

use crate::answer::Answer;
use crate::config::Settings;
use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Trait for retrieval indexes the store can persist.
///
/// Implementations must serialize their whole state; the store writes them
/// to disk wholesale after every ingestion batch.
#[async_trait]
pub trait DocumentIndex: Default + Serialize + DeserializeOwned + Send + Sync {
    /// Ingest one document into the index
    async fn add(&mut self, path: &Path, settings: &Settings) -> Result<()>;

    /// Answer one question against the indexed documents
    async fn query(&self, question: &str, settings: &Settings) -> Result<Answer>;
}
