//! paperdex — ask questions of a personal PDF paper library
//!
//! A thin CLI around three pieces: a persistent, deduplicated
//! [`store::IndexStore`] wrapping a retrieval index, a
//! [`config::Settings`] selector between the OpenAI API and a local Ollama
//! model, and a query forwarder that renders the structured [`answer::Answer`].

pub mod answer;
pub mod chunk;
pub mod commands;
pub mod config;
pub mod discover;
pub mod embed;
pub mod error;
pub mod index;
pub mod llm;
pub mod store;
