use super::DocumentIndex;
use crate::answer::{Answer, Context};
use crate::chunk::chunk_text;
use crate::config::Settings;
use crate::embed::{cosine_similarity, create_embedder, embed_in_batches, normalize_embedding};
use crate::error::{Error, Result};
use crate::llm::create_chat_model;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Batch size for embedding requests
const EMBED_BATCH_SIZE: usize = 32;

/// Display length cap for evidence snippets
const CONTEXT_PREVIEW_CHARS: usize = 280;

const SYSTEM_PROMPT: &str = "You are a research assistant answering questions about a \
personal library of papers. Use only the provided evidence excerpts. Cite evidence by \
its bracketed number, e.g. [1]. If the evidence is insufficient, say so.";

const NO_EVIDENCE_ANSWER: &str =
    "I could not find relevant information in the indexed documents.";

/// Built-in retrieval index over chunked, embedded PDF text
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaperIndex {
    papers: Vec<Paper>,
}

/// One ingested paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub filename: String,
    pub added_at: DateTime<Utc>,
    pub chunks: Vec<StoredChunk>,
}

/// One chunk of paper text with its normalized embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

struct Evidence<'a> {
    score: f32,
    source: &'a str,
    text: &'a str,
}

impl PaperIndex {
    /// Number of ingested papers
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Ingest already-extracted text under `filename`
    pub async fn add_text(
        &mut self,
        filename: &str,
        text: &str,
        settings: &Settings,
    ) -> Result<()> {
        let pieces = chunk_text(text, &settings.chunk);
        if pieces.is_empty() {
            return Err(Error::Pdf(format!("{} contains no extractable text", filename)));
        }
        debug!("{}: {} chunks", filename, pieces.len());

        let embedder = create_embedder(settings)?;
        let batch = embed_in_batches(embedder.as_ref(), pieces.clone(), EMBED_BATCH_SIZE).await?;

        let chunks = pieces
            .into_iter()
            .zip(batch.embeddings)
            .map(|(text, embedding)| StoredChunk {
                text,
                embedding: normalize_embedding(&embedding),
            })
            .collect();

        self.papers.push(Paper {
            filename: filename.to_string(),
            added_at: Utc::now(),
            chunks,
        });

        info!(
            "Indexed {} ({} embedding tokens)",
            filename, batch.tokens_used
        );
        Ok(())
    }

    /// Rank all chunks against a query vector, best first, keeping at most
    /// `k` results at or above `min_score`.
    fn rank_evidence(&self, query: &[f32], k: usize, min_score: f32) -> Vec<Evidence<'_>> {
        let mut scored: Vec<Evidence<'_>> = self
            .papers
            .iter()
            .flat_map(|paper| {
                paper.chunks.iter().map(move |chunk| Evidence {
                    score: cosine_similarity(query, &chunk.embedding),
                    source: paper.filename.as_str(),
                    text: chunk.text.as_str(),
                })
            })
            .filter(|e| e.score >= min_score)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

fn build_user_prompt(question: &str, evidence: &[Evidence<'_>]) -> String {
    let mut prompt = String::from("Evidence excerpts:\n\n");
    for (i, e) in evidence.iter().enumerate() {
        prompt.push_str(&format!("[{}] (from {}):\n{}\n\n", i + 1, e.source, e.text));
    }
    prompt.push_str(&format!("Question: {}", question));
    prompt
}

fn build_references(evidence: &[Evidence<'_>]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    for e in evidence {
        if !seen.contains(&e.source) {
            seen.push(e.source);
            lines.push(format!("{}. {}", seen.len(), e.source));
        }
    }
    lines.join("\n")
}

fn preview(text: &str) -> String {
    if text.len() <= CONTEXT_PREVIEW_CHARS {
        return text.replace('\n', " ");
    }
    let mut end = CONTEXT_PREVIEW_CHARS;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", text[..end].replace('\n', " ").trim_end())
}

#[async_trait]
impl DocumentIndex for PaperIndex {
    async fn add(&mut self, path: &Path, settings: &Settings) -> Result<()> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Pdf(format!("invalid file name: {}", path.display())))?
            .to_string();

        let text = pdf_extract::extract_text(path)
            .map_err(|e| Error::Pdf(format!("failed to extract {}: {}", path.display(), e)))?;

        self.add_text(&filename, &text, settings).await
    }

    async fn query(&self, question: &str, settings: &Settings) -> Result<Answer> {
        let mut token_counts: HashMap<String, u64> = HashMap::new();

        if self.is_empty() {
            return Ok(Answer {
                question: question.to_string(),
                answer: NO_EVIDENCE_ANSWER.to_string(),
                ..Default::default()
            });
        }

        let embedder = create_embedder(settings)?;
        let batch = embedder.embed(vec![question.to_string()]).await?;
        let query_vector = batch
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding returned for query".to_string()))?;
        let query_vector = normalize_embedding(&query_vector);
        *token_counts
            .entry(settings.embedding_model.clone())
            .or_default() += batch.tokens_used;

        let evidence =
            self.rank_evidence(&query_vector, settings.query.evidence_k, settings.query.min_score);
        debug!("{} evidence chunks above cutoff", evidence.len());

        if evidence.is_empty() {
            return Ok(Answer {
                question: question.to_string(),
                answer: NO_EVIDENCE_ANSWER.to_string(),
                token_counts,
                ..Default::default()
            });
        }

        let chat = create_chat_model(settings)?;
        let output = chat
            .complete(SYSTEM_PROMPT, &build_user_prompt(question, &evidence))
            .await?;
        *token_counts.entry(settings.llm_model.clone()).or_default() += output.total_tokens();

        let references = build_references(&evidence);
        let contexts = evidence
            .iter()
            .map(|e| Context {
                text: preview(e.text),
                source: e.source.to_string(),
                score: e.score,
            })
            .collect();

        Ok(Answer {
            question: question.to_string(),
            answer: output.text,
            references,
            token_counts,
            contexts,
        })
    }
}
