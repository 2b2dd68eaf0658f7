//! Text chunking for ingestion
//!
//! Splits extracted PDF text into overlapping chunks under a character
//! budget, preferring paragraph breaks, then sentence ends, then word
//! boundaries.

use crate::config::ChunkSettings;

/// Split `text` into chunks of at most `settings.max_chars` bytes with
/// `settings.overlap_chars` of overlap between consecutive chunks.
pub fn chunk_text(text: &str, settings: &ChunkSettings) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if text.len() <= settings.max_chars {
        return vec![text.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut start = 0usize;

    while start < text.len() {
        let remaining = &text[start..];

        if remaining.len() <= settings.max_chars {
            let tail = remaining.trim();
            // Merge a tiny trailing fragment into the previous chunk
            if tail.len() < settings.min_chars && !chunks.is_empty() {
                let last = chunks.last_mut().unwrap();
                last.push('\n');
                last.push_str(tail);
            } else if !tail.is_empty() {
                chunks.push(tail.to_string());
            }
            break;
        }

        let hard_end = prev_boundary(text, start + settings.max_chars);
        let window = &text[start..hard_end];
        let cut = match find_break(window) {
            Some(pos) if pos > 0 => pos,
            _ => window.len(),
        };
        let end = start + cut;

        let piece = text[start..end].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        let mut next = prev_boundary(text, end.saturating_sub(settings.overlap_chars));
        if next <= start {
            // Overlap would stall; continue from the cut instead
            next = end;
        }
        start = next;
    }

    chunks
}

/// Find the best cut position inside `window`, searching the second half
/// only so chunks stay reasonably full.
fn find_break(window: &str) -> Option<usize> {
    let floor = window.len() / 2;

    if let Some(pos) = window.rfind("\n\n") {
        if pos >= floor {
            return Some(pos);
        }
    }

    for pat in [". ", ".\n", "? ", "! "] {
        if let Some(pos) = window.rfind(pat) {
            if pos >= floor {
                return Some(pos + 1);
            }
        }
    }

    if let Some(pos) = window.rfind(char::is_whitespace) {
        if pos >= floor {
            return Some(pos);
        }
    }

    None
}

/// Largest char boundary <= `i`
fn prev_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
