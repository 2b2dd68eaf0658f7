//! Persistent, deduplicated store around a retrieval index
//!
//! [`IndexStore`] owns the index plus a set of filenames already ingested,
//! making directory ingestion idempotent without asking the index whether a
//! document is present. The whole store is rewritten on every save; index
//! sizes are personal-library scale and saves happen once per invocation.
//! A single writer per storage path is assumed; there is no file locking.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::index::DocumentIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Statistics from one ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Documents newly added to the index
    pub docs_added: usize,
    /// Documents skipped because they were already ingested
    pub docs_skipped: usize,
    /// Directory entries ignored (not `.pdf` files)
    pub files_ignored: usize,
}

/// On-disk shape of the store
#[derive(Deserialize)]
struct PersistedState<I> {
    index: I,
    seen_files: HashSet<String>,
}

/// Borrowed view of the store state for serialization
#[derive(Serialize)]
struct PersistedStateRef<'a, I> {
    index: &'a I,
    seen_files: &'a HashSet<String>,
}

/// Persistence and deduplication wrapper around a retrieval index
pub struct IndexStore<I> {
    storage_path: PathBuf,
    pub index: I,
    pub seen_files: HashSet<String>,
}

impl<I: DocumentIndex> IndexStore<I> {
    /// Load the store at `storage_path`, or create a fresh one.
    ///
    /// A missing file, an unreadable file, or a blob of the wrong shape all
    /// yield a fresh empty store; only the reason is logged differently.
    pub fn open(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();

        let state = match std::fs::read(&storage_path) {
            Ok(bytes) => match serde_json::from_slice::<PersistedState<I>>(&bytes) {
                Ok(state) => {
                    info!("Loaded existing index from {}", storage_path.display());
                    Some(state)
                }
                Err(e) => {
                    warn!(
                        "{} does not contain a valid index ({}); creating a new one",
                        storage_path.display(),
                        e
                    );
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Creating new index at {}", storage_path.display());
                None
            }
            Err(e) => {
                // Reported for operator visibility, but a fresh store is
                // still produced
                error!(
                    "{}",
                    Error::Deserialize(format!("{}: {}", storage_path.display(), e))
                );
                None
            }
        };

        match state {
            Some(state) => Self {
                storage_path,
                index: state.index,
                seen_files: state.seen_files,
            },
            None => Self {
                storage_path,
                index: I::default(),
                seen_files: HashSet::new(),
            },
        }
    }

    /// Whether a serialized store exists at `storage_path`
    pub fn exists(storage_path: &Path) -> bool {
        storage_path.exists()
    }

    /// Add all unseen `.pdf` files from `directory` to the index.
    ///
    /// Re-running on an unchanged directory adds nothing and calls the index
    /// zero times. The store is persisted after the batch even when no file
    /// was added; a persistence failure is logged and does not fail the run.
    pub async fn ingest_directory(
        &mut self,
        directory: &Path,
        settings: &Settings,
    ) -> Result<IngestStats> {
        if !directory.is_dir() {
            return Err(Error::NotADirectory(directory.to_path_buf()));
        }

        let mut stats = IngestStats::default();

        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().into_owned();

            if self.seen_files.contains(&filename) {
                debug!("Skipping {} as it is already added", filename);
                stats.docs_skipped += 1;
                continue;
            }

            if !filename.to_lowercase().ends_with(".pdf") {
                stats.files_ignored += 1;
                continue;
            }

            self.index.add(&entry.path(), settings).await?;
            self.seen_files.insert(filename.clone());
            stats.docs_added += 1;
            info!("Added {} to the document index", filename);
        }

        if let Err(e) = self.persist() {
            error!("{}", e);
        }

        Ok(stats)
    }

    /// Serialize the whole store to its storage path, overwriting any
    /// existing file.
    pub fn persist(&self) -> Result<()> {
        if self.storage_path.exists() {
            warn!("{} already exists. Overwriting...", self.storage_path.display());
        }

        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Persistence(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let state = PersistedStateRef {
            index: &self.index,
            seen_files: &self.seen_files,
        };
        let bytes = serde_json::to_vec(&state)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        std::fs::write(&self.storage_path, bytes)
            .map_err(|e| Error::Persistence(format!("{}: {}", self.storage_path.display(), e)))?;

        info!("Document index saved to {}", self.storage_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Answer;
    use crate::config::{LlmBackend, Settings};
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Index double that records calls instead of talking to a backend
    #[derive(Debug, Default, Serialize, Deserialize)]
    struct RecordingIndex {
        added: Vec<String>,
    }

    #[async_trait]
    impl DocumentIndex for RecordingIndex {
        async fn add(&mut self, path: &Path, _settings: &Settings) -> Result<()> {
            self.added
                .push(path.file_name().unwrap().to_string_lossy().into_owned());
            Ok(())
        }

        async fn query(&self, question: &str, _settings: &Settings) -> Result<Answer> {
            Ok(Answer {
                question: question.to_string(),
                answer: format!("{} documents indexed", self.added.len()),
                ..Default::default()
            })
        }
    }

    fn test_settings() -> Settings {
        Settings::build(LlmBackend::Ollama, Some("test-model".to_string())).unwrap()
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"%PDF-1.4 stub").unwrap();
    }

    #[test]
    fn test_open_missing_file_yields_fresh_store() {
        let tmp = TempDir::new().unwrap();
        let store = IndexStore::<RecordingIndex>::open(tmp.path().join("index.json"));

        assert!(store.seen_files.is_empty());
        assert!(store.index.added.is_empty());
    }

    #[test]
    fn test_open_corrupt_blob_yields_fresh_store() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.json");
        std::fs::write(&path, br#"{"totally": "unexpected shape"}"#).unwrap();

        let store = IndexStore::<RecordingIndex>::open(&path);
        assert!(store.seen_files.is_empty());
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not_a_dir.txt");
        std::fs::write(&file, b"plain file").unwrap();

        let store_path = tmp.path().join("index.json");
        let mut store = IndexStore::<RecordingIndex>::open(&store_path);
        let result = store.ingest_directory(&file, &test_settings()).await;

        assert!(matches!(result, Err(Error::NotADirectory(_))));
        assert!(store.seen_files.is_empty());
        // Aborted before the unconditional persist
        assert!(!store_path.exists());
    }

    #[tokio::test]
    async fn test_ingest_adds_only_pdfs() {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();
        touch(&papers, "a.pdf");
        touch(&papers, "b.pdf");
        touch(&papers, "notes.txt");

        let mut store = IndexStore::<RecordingIndex>::open(tmp.path().join("index.json"));
        let stats = store.ingest_directory(&papers, &test_settings()).await.unwrap();

        assert_eq!(stats.docs_added, 2);
        assert_eq!(stats.files_ignored, 1);
        assert_eq!(store.seen_files.len(), 2);
        assert!(store.seen_files.contains("a.pdf"));
        assert!(!store.seen_files.contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();
        touch(&papers, "a.pdf");
        touch(&papers, "b.pdf");

        let mut store = IndexStore::<RecordingIndex>::open(tmp.path().join("index.json"));
        let settings = test_settings();

        let first = store.ingest_directory(&papers, &settings).await.unwrap();
        assert_eq!(first.docs_added, 2);
        assert_eq!(store.index.added.len(), 2);

        let second = store.ingest_directory(&papers, &settings).await.unwrap();
        assert_eq!(second.docs_added, 0);
        assert_eq!(second.docs_skipped, 2);
        // Zero additional calls to the index
        assert_eq!(store.index.added.len(), 2);
    }

    #[tokio::test]
    async fn test_seen_files_deduplicate_across_runs() {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();
        touch(&papers, "a.pdf");

        let mut store = IndexStore::<RecordingIndex>::open(tmp.path().join("index.json"));
        store.seen_files.insert("a.pdf".to_string());

        touch(&papers, "b.pdf");
        let stats = store.ingest_directory(&papers, &test_settings()).await.unwrap();

        assert_eq!(stats.docs_added, 1);
        assert_eq!(store.index.added, vec!["b.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_persist_and_reopen_round_trip() {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();
        touch(&papers, "x.pdf");

        let store_path = tmp.path().join("index.json");
        let mut store = IndexStore::<RecordingIndex>::open(&store_path);
        store.ingest_directory(&papers, &test_settings()).await.unwrap();
        assert!(store_path.exists());

        let reopened = IndexStore::<RecordingIndex>::open(&store_path);
        assert_eq!(reopened.seen_files.len(), 1);
        assert!(reopened.seen_files.contains("x.pdf"));
        assert_eq!(reopened.index.added, vec!["x.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_directory_still_persists() {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();

        let store_path = tmp.path().join("index.json");
        let mut store = IndexStore::<RecordingIndex>::open(&store_path);
        let stats = store.ingest_directory(&papers, &test_settings()).await.unwrap();

        assert_eq!(stats.docs_added, 0);
        assert!(store_path.exists());
    }

    #[tokio::test]
    async fn test_persist_failure_does_not_fail_ingest() {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        std::fs::create_dir(&papers).unwrap();
        touch(&papers, "a.pdf");

        // Storage path is a directory, so the write must fail
        let store_path = tmp.path().join("blocked");
        std::fs::create_dir(&store_path).unwrap();

        let mut store = IndexStore::<RecordingIndex>::open(&store_path);
        let stats = store.ingest_directory(&papers, &test_settings()).await.unwrap();

        assert_eq!(stats.docs_added, 1);
        assert!(store.persist().is_err());
    }
}
