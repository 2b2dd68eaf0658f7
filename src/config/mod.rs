//! Settings construction for paperdex
//!
//! Builds the immutable per-invocation [`Settings`] bundle from the selected
//! LLM backend and model name. Construction is pure apart from reading the
//! process environment; nothing here touches the index.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which question-answering backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Remote OpenAI API (requires OPENAI_API_KEY)
    Openai,
    /// Local model served by Ollama
    Ollama,
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmBackend::Openai => write!(f, "openai"),
            LlmBackend::Ollama => write!(f, "ollama"),
        }
    }
}

/// Immutable settings bundle, constructed once per CLI invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Selected backend
    pub backend: LlmBackend,

    /// Chat model used for answer synthesis
    pub llm_model: String,

    /// Embedding model (for Ollama, the chat model doubles as embedder)
    pub embedding_model: String,

    /// OpenAI-compatible API base URL, e.g. `https://api.openai.com/v1`
    pub api_base: String,

    /// Bearer token, present only for the remote backend
    pub api_key: Option<String>,

    /// Chunking parameters
    pub chunk: ChunkSettings,

    /// Retrieval/synthesis parameters
    pub query: QuerySettings,
}

/// Chunking parameters for document ingestion
#[derive(Debug, Clone)]
pub struct ChunkSettings {
    /// Maximum characters per chunk
    pub max_chars: usize,

    /// Overlap characters between consecutive chunks
    pub overlap_chars: usize,

    /// Minimum chunk size (trailing fragments below this are merged)
    pub min_chars: usize,
}

/// Retrieval and answer-synthesis parameters
#[derive(Debug, Clone)]
pub struct QuerySettings {
    /// Number of evidence chunks passed to the LLM
    pub evidence_k: usize,

    /// Minimum cosine similarity for a chunk to count as evidence
    pub min_score: f32,

    /// Request timeout for model calls, in seconds
    pub timeout_secs: u64,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            max_chars: default_chunk_max_chars(),
            overlap_chars: default_chunk_overlap(),
            min_chars: default_chunk_min_chars(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            evidence_k: default_evidence_k(),
            min_score: default_min_score(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    /// Build settings for the selected backend.
    ///
    /// For [`LlmBackend::Openai`] the OPENAI_API_KEY environment variable
    /// must be set; for [`LlmBackend::Ollama`] a model name is required
    /// (discovery of a running model happens before this call, see
    /// [`crate::discover`]).
    pub fn build(backend: LlmBackend, model: Option<String>) -> Result<Self> {
        match backend {
            LlmBackend::Openai => Self::build_openai(model),
            LlmBackend::Ollama => Self::build_ollama(model),
        }
    }

    fn build_openai(model: Option<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config("OPENAI_API_KEY is not set in the environment".to_string())
        })?;

        Ok(Self {
            backend: LlmBackend::Openai,
            llm_model: model.unwrap_or_else(default_openai_model),
            embedding_model: default_openai_embedding_model(),
            api_base: default_openai_api_base(),
            api_key: Some(api_key),
            chunk: ChunkSettings::default(),
            query: QuerySettings::default(),
        })
    }

    fn build_ollama(model: Option<String>) -> Result<Self> {
        let llm_model = model.ok_or_else(|| {
            Error::Config(
                "No Ollama model selected and none is running; pass --ollama_model".to_string(),
            )
        })?;

        Ok(Self {
            backend: LlmBackend::Ollama,
            // Ollama exposes an OpenAI-compatible API under /v1
            api_base: format!("{}/v1", default_ollama_host().trim_end_matches('/')),
            embedding_model: llm_model.clone(),
            llm_model,
            api_key: None,
            chunk: ChunkSettings::default(),
            query: QuerySettings::default(),
        })
    }
}
