use super::{EmbedBatch, Embedder};
use crate::config::Settings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Embedder speaking the OpenAI-compatible `/embeddings` endpoint.
///
/// Both the OpenAI API and Ollama's `/v1` surface accept the same request
/// shape, so one backend covers both settings variants.
pub struct HttpEmbedder {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

impl HttpEmbedder {
    pub fn new(settings: &Settings) -> Result<Self> {
        let base = Url::parse(&format!("{}/", settings.api_base.trim_end_matches('/')))?;
        let endpoint = base.join("embeddings")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.query.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
            model: settings.embedding_model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<EmbedBatch> {
        if texts.is_empty() {
            return Ok(EmbedBatch::default());
        }

        let mut request = self.client.post(self.endpoint.clone()).json(&EmbeddingRequest {
            model: &self.model,
            input: &texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "embeddings request failed with {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        Ok(EmbedBatch {
            embeddings: parsed.data.into_iter().map(|d| d.embedding).collect(),
            tokens_used: parsed.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmBackend, ChunkSettings, QuerySettings};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_settings(api_base: String, api_key: Option<String>) -> Settings {
        Settings {
            backend: LlmBackend::Ollama,
            llm_model: "test-model".to_string(),
            embedding_model: "test-embed".to_string(),
            api_base,
            api_key,
            chunk: ChunkSettings::default(),
            query: QuerySettings::default(),
        }
    }

    #[tokio::test]
    async fn test_embed_parses_vectors_and_usage() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(body_partial_json(serde_json::json!({ "model": "test-embed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "embedding": [0.1, 0.2], "index": 0 },
                    { "embedding": [0.3, 0.4], "index": 1 }
                ],
                "usage": { "prompt_tokens": 9, "total_tokens": 9 }
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_settings(server.uri(), None)).unwrap();
        let batch = embedder
            .embed(vec!["one".to_string(), "two".to_string()])
            .await
            .unwrap();

        assert_eq!(batch.embeddings.len(), 2);
        assert_eq!(batch.embeddings[0], vec![0.1, 0.2]);
        assert_eq!(batch.tokens_used, 9);
    }

    #[tokio::test]
    async fn test_embed_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [ { "embedding": [1.0] } ]
            })))
            .mount(&server)
            .await;

        let settings = test_settings(server.uri(), Some("sk-test".to_string()));
        let embedder = HttpEmbedder::new(&settings).unwrap();
        let batch = embedder.embed(vec!["x".to_string()]).await.unwrap();

        assert_eq!(batch.embeddings.len(), 1);
        assert_eq!(batch.tokens_used, 0);
    }

    #[tokio::test]
    async fn test_embed_count_mismatch_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [ { "embedding": [1.0] } ]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_settings(server.uri(), None)).unwrap();
        let result = embedder
            .embed(vec!["one".to_string(), "two".to_string()])
            .await;

        assert!(matches!(result, Err(Error::Embedding(_))));
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        // No server: must not issue a request at all
        let embedder = HttpEmbedder::new(&test_settings("http://127.0.0.1:1".to_string(), None)).unwrap();
        let batch = embedder.embed(Vec::new()).await.unwrap();
        assert!(batch.embeddings.is_empty());
    }
}
