//! Default values for settings

use std::path::PathBuf;

/// Default OpenAI API base URL (override with OPENAI_API_BASE)
pub fn default_openai_api_base() -> String {
    std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
}

/// Default OpenAI chat model
pub fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default OpenAI embedding model
pub fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Default Ollama host (override with OLLAMA_HOST)
pub fn default_ollama_host() -> String {
    std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string())
}

/// Default maximum characters per chunk
pub fn default_chunk_max_chars() -> usize {
    3000
}

/// Default overlap characters between chunks
pub fn default_chunk_overlap() -> usize {
    300
}

/// Default minimum chunk size (don't create tiny chunks)
pub fn default_chunk_min_chars() -> usize {
    200
}

/// Default number of evidence chunks passed to the LLM
pub fn default_evidence_k() -> usize {
    5
}

/// Default minimum cosine similarity for evidence
pub fn default_min_score() -> f32 {
    0.1
}

/// Default request timeout in seconds for model calls
pub fn default_request_timeout_secs() -> u64 {
    300
}

/// Default path for the persisted index (~/.paperdex/index.json)
pub fn default_index_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".paperdex")
        .join("index.json")
}

/// Default directory scanned for papers
pub fn default_paper_dir() -> PathBuf {
    PathBuf::from("papers")
}
