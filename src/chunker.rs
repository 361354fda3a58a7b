//! Recursive character splitting of documents into overlapping chunks.
//!
//! The splitter walks a prioritized list of separators (paragraph break,
//! line break, space, ...) and recursively breaks the document along the
//! highest-priority separator that still occurs in an oversized piece. The
//! empty-string separator forces a hard character split, so termination is
//! guaranteed for any input. Separators are kept attached to the preceding
//! piece, which means concatenating the produced chunk bodies reconstructs
//! the original document exactly.
//!
//! After splitting, adjacent chunks are stitched together by copying
//! `overlap` characters from the end of the previous chunk into the start of
//! the next one. The splitting budget reserves room for that overlap, so no
//! stitched chunk ever exceeds `chunk_size` characters.
//!
//! All character counts are Unicode scalar counts; splits always land on
//! char boundaries.

use crate::types::{Chunk, RagError};

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default number of characters shared between adjacent chunks.
pub const DEFAULT_OVERLAP: usize = 50;

/// Default separator priority: paragraph break, line break, word boundary,
/// then a hard character split.
pub fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", "", "###"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Configuration for [`TextChunker`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters, overlap included.
    pub chunk_size: usize,
    /// Characters copied from the end of each chunk into the next one.
    pub overlap: usize,
    /// Separators tried in priority order. An empty string forces a hard
    /// character split and guarantees termination.
    pub separators: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            separators: default_separators(),
        }
    }
}

impl ChunkerConfig {
    /// Validate the configuration before any chunking work happens.
    ///
    /// An overlap that is not strictly smaller than the chunk size would
    /// make the stitched output degenerate, so it is rejected here.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.overlap >= self.chunk_size {
            return Err(RagError::Configuration(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits documents into overlapping [`Chunk`]s.
///
/// The output is a pure function of the document and the configuration: no
/// randomness, fully reproducible.
#[derive(Clone, Debug)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    /// Create a chunker, validating the configuration first.
    pub fn new(config: ChunkerConfig) -> Result<Self, RagError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a chunker with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }

    /// Access the active configuration.
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `document` into overlapping chunks attributed to `source_id`.
    ///
    /// An empty document yields no chunks; a document no longer than the
    /// chunk size yields exactly one chunk with no overlap applied.
    pub fn split(&self, document: &str, source_id: &str) -> Vec<Chunk> {
        if document.is_empty() {
            return Vec::new();
        }
        if char_len(document) <= self.config.chunk_size {
            return vec![Chunk::new(document, 0, source_id)];
        }

        // Bodies are cut to chunk_size - overlap so that prepending the
        // overlap never pushes a stitched chunk past chunk_size.
        let budget = self.config.chunk_size - self.config.overlap;
        let pieces = split_recursive(document, budget, &self.config.separators);
        let bodies = merge_pieces(pieces, budget);

        let mut chunks = Vec::with_capacity(bodies.len());
        let mut carried: Option<String> = None;
        for (ordinal, body) in bodies.iter().enumerate() {
            let text = match carried.take() {
                Some(tail) => format!("{tail}{body}"),
                None => body.clone(),
            };
            carried = Some(char_suffix(body, self.config.overlap));
            chunks.push(Chunk::new(text, ordinal, source_id));
        }
        chunks
    }
}

/// Recursively split `text` into pieces of at most `budget` characters,
/// descending through `separators` whenever a piece is still too long.
fn split_recursive(text: &str, budget: usize, separators: &[String]) -> Vec<String> {
    if char_len(text) <= budget {
        return vec![text.to_string()];
    }
    let Some((separator, rest)) = separators.split_first() else {
        return hard_split(text, budget);
    };
    if separator.is_empty() {
        return hard_split(text, budget);
    }
    if !text.contains(separator.as_str()) {
        return split_recursive(text, budget, rest);
    }

    let mut pieces = Vec::new();
    for piece in split_keep_separator(text, separator) {
        if char_len(&piece) <= budget {
            pieces.push(piece);
        } else {
            pieces.extend(split_recursive(&piece, budget, rest));
        }
    }
    pieces
}

/// Split on `separator`, keeping the separator attached to the piece that
/// precedes it so the pieces concatenate back to `text`.
fn split_keep_separator(text: &str, separator: &str) -> Vec<String> {
    let raw: Vec<&str> = text.split(separator).collect();
    let last = raw.len() - 1;
    raw.into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if i < last {
                format!("{piece}{separator}")
            } else {
                piece.to_string()
            }
        })
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Greedily merge consecutive pieces into bodies of at most `budget` chars.
fn merge_pieces(pieces: Vec<String>, budget: usize) -> Vec<String> {
    let mut bodies = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for piece in pieces {
        let piece_len = char_len(&piece);
        if current_len > 0 && current_len + piece_len > budget {
            bodies.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(&piece);
        current_len += piece_len;
    }
    if !current.is_empty() {
        bodies.push(current);
    }
    bodies
}

/// Split into runs of exactly `budget` characters (the last run may be
/// shorter), respecting char boundaries.
fn hard_split(text: &str, budget: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut count = 0usize;
    for (idx, _) in text.char_indices() {
        if count == budget {
            out.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        out.push(text[start..].to_string());
    }
    out
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of `text`, or all of it when shorter.
fn char_suffix(text: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let total = char_len(text);
    if total <= n {
        return text.to_string();
    }
    match text.char_indices().nth(total - n) {
        Some((idx, _)) => text[idx..].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(ChunkerConfig {
            chunk_size,
            overlap,
            separators: default_separators(),
        })
        .unwrap()
    }

    /// Reassemble the source document from chunks by stripping each chunk's
    /// overlap prefix: the prefix length is min(overlap, body length of the
    /// previous chunk), where the body is what remains after stripping.
    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut document = String::new();
        let mut prev_body_len: Option<usize> = None;
        for chunk in chunks {
            let body: String = match prev_body_len {
                None => chunk.text.clone(),
                Some(prev) => {
                    let shared = overlap.min(prev);
                    chunk.text.chars().skip(shared).collect()
                }
            };
            prev_body_len = Some(body.chars().count());
            document.push_str(&body);
        }
        document
    }

    #[test]
    fn overlap_not_smaller_than_chunk_size_is_rejected() {
        let err = TextChunker::new(ChunkerConfig {
            chunk_size: 50,
            overlap: 50,
            separators: default_separators(),
        })
        .unwrap_err();
        assert!(matches!(err, RagError::Configuration(_)));

        let err = TextChunker::new(ChunkerConfig {
            chunk_size: 10,
            overlap: 20,
            separators: default_separators(),
        })
        .unwrap_err();
        assert!(matches!(err, RagError::Configuration(_)));
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let chunks = chunker(100, 10).split("", "doc");
        assert!(chunks.is_empty());
    }

    #[test]
    fn short_document_yields_single_chunk_without_overlap() {
        let doc = "Paris is the capital of France.\n\nBerlin is the capital of Germany.";
        let chunks = chunker(1000, 50).split(doc, "capitals");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, doc);
        assert_eq!(chunks[0].ordinal, 0);
        assert_eq!(chunks[0].source_id, "capitals");
    }

    #[test]
    fn long_document_produces_overlapping_chunks() {
        let doc: String = (0..250)
            .map(|i| format!("word{i:04}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(doc.chars().count() >= 2200);

        let chunks = chunker(1000, 50).split(&doc, "doc");
        assert!(chunks.len() >= 3, "expected >= 3 chunks, got {}", chunks.len());

        for chunk in &chunks {
            assert!(
                chunk.text.chars().count() <= 1000,
                "chunk {} exceeds chunk_size",
                chunk.ordinal
            );
        }

        // Each consecutive pair shares a 50-character boundary substring.
        for pair in chunks.windows(2) {
            let tail: String = {
                let total = pair[0].text.chars().count();
                pair[0].text.chars().skip(total - 50).collect()
            };
            let head: String = pair[1].text.chars().take(50).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn chunks_reconstruct_the_document() {
        let doc: String = (0..120)
            .map(|i| format!("sentence number {i} of the sample document."))
            .collect::<Vec<_>>()
            .join("\n\n");
        let overlap = 30;
        let chunks = chunker(200, overlap).split(&doc, "doc");
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks, overlap), doc);
    }

    #[test]
    fn hard_split_covers_separator_free_text() {
        let doc = "x".repeat(537);
        let overlap = 10;
        let chunks = chunker(100, overlap).split(&doc, "doc");
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 100);
        }
        assert_eq!(reconstruct(&chunks, overlap), doc);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let doc = "héllo wörld ".repeat(60);
        let overlap = 8;
        let chunks = chunker(40, overlap).split(&doc, "doc");
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 40);
        }
        assert_eq!(reconstruct(&chunks, overlap), doc);
    }

    #[test]
    fn splitting_is_deterministic() {
        let doc: String = (0..80)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let a = chunker(64, 8).split(&doc, "doc");
        let b = chunker(64, 8).split(&doc, "doc");
        assert_eq!(a, b);
    }

    #[test]
    fn paragraph_separator_takes_priority_over_hard_split() {
        let doc = format!("{}\n\n{}", "a".repeat(40), "b".repeat(40));
        let chunks = chunker(60, 10).split(&doc, "doc");
        // The paragraph break is a clean split point, so no chunk mixes the
        // two runs beyond the stitched overlap.
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with('a'));
        assert!(chunks[0].text.ends_with("\n\n"));
        assert!(chunks[1].text.ends_with('b'));
    }
}
