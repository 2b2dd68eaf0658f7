//! Discovery of the currently running Ollama model
//!
//! When the local backend is selected without an explicit model name, ask
//! the Ollama daemon which model is loaded (`GET /api/ps`) and use the first
//! one. An unreachable daemon or an empty model list both yield `None`; the
//! caller decides whether that is fatal.

use crate::error::Result;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PsResponse {
    #[serde(default)]
    models: Vec<RunningModel>,
}

#[derive(Debug, Deserialize)]
struct RunningModel {
    name: String,
}

/// Return the name of the first model currently loaded by the Ollama daemon
/// at `host`, or `None` if the daemon is unreachable or idle.
pub async fn running_ollama_model(host: &str) -> Result<Option<String>> {
    let url = format!("{}/api/ps", host.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let response = match client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!("Ollama daemon not reachable at {}: {}", url, e);
            return Ok(None);
        }
    };

    if !response.status().is_success() {
        debug!("Ollama /api/ps returned status {}", response.status());
        return Ok(None);
    }

    let ps: PsResponse = response.json().await?;
    Ok(ps.models.into_iter().next().map(|m| m.name))
}
