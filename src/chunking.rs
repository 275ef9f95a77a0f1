//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`ParagraphChunker`],
//! which splits text on blank-line boundaries and cuts over-long
//! paragraphs at word boundaries.

/// A strategy for splitting document text into bounded-length chunks.
///
/// Implementations must be deterministic and preserve original text order
/// in the returned sequence. An empty input yields an empty `Vec`; callers
/// treat that as a validation failure.
pub trait Chunker: Send + Sync {
    /// Split text into an ordered sequence of non-empty chunks.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Splits text into paragraphs on blank lines, then cuts paragraphs that
/// exceed `max_chars` at the last whitespace boundary before the limit.
///
/// Lengths are measured in characters, not bytes, so multi-byte text is
/// never cut mid-character. If a paragraph has no whitespace within the
/// first `max_chars` characters it is hard-cut at the limit.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    max_chars: usize,
}

impl ParagraphChunker {
    /// Create a new `ParagraphChunker`.
    ///
    /// # Arguments
    ///
    /// * `max_chars` — maximum number of characters per chunk
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

/// Byte offset of the `max_chars`-th character, or the full length if the
/// string is shorter.
fn char_boundary(s: &str, max_chars: usize) -> usize {
    s.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(s.len())
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        let normalized = text.replace("\r\n", "\n");
        let mut chunks = Vec::new();

        for paragraph in normalized.split("\n\n") {
            let mut part = paragraph.trim();
            if part.is_empty() {
                continue;
            }

            while part.chars().count() > self.max_chars {
                let limit = char_boundary(part, self.max_chars);
                let cut = match part[..limit].rfind(' ') {
                    Some(at) if at > 0 => at,
                    _ => limit,
                };
                let head = part[..cut].trim();
                if !head.is_empty() {
                    chunks.push(head.to_string());
                }
                part = part[cut..].trim();
            }
            if !part.is_empty() {
                chunks.push(part.to_string());
            }
        }

        // Degenerate input (non-empty but no usable paragraphs) still gets
        // one chunk so that non-empty input never yields zero chunks.
        if chunks.is_empty() && !normalized.is_empty() {
            let limit = char_boundary(&normalized, self.max_chars);
            chunks.push(normalized[..limit].to_string());
        }

        chunks
    }
}
