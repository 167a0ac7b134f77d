//! Splits corpus documents into passages for embedding and retrieval.
//! Two policies: fixed word-count windows, or blank-line paragraphs.

use serde::{Deserialize, Serialize};

use crate::corpus::Document;

/// Default maximum words per passage. Keeps passages small enough for embedding models.
pub const DEFAULT_MAX_WORDS: usize = 200;

/// How raw document text is cut into passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkPolicy {
    /// Non-overlapping windows of at most `max_words` whitespace-delimited words.
    Words { max_words: usize },
    /// Split on blank lines; each paragraph becomes one passage.
    Paragraphs,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        ChunkPolicy::Words {
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

/// A passage of corpus text, the atomic retrievable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub text: String,
    /// Identifier of the originating document, if known.
    pub source_id: Option<String>,
    /// Index of this passage within the document (0, 1, 2, …).
    pub sequence_index: usize,
}

/// Chunk a single document into passages under the given policy.
/// Empty or whitespace-only text yields no passages.
pub fn chunk_document(doc: &Document, policy: ChunkPolicy) -> Vec<Passage> {
    let text = doc.text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    split_text(text, policy)
        .into_iter()
        .enumerate()
        .map(|(i, t)| Passage {
            text: t,
            source_id: Some(doc.id.clone()),
            sequence_index: i,
        })
        .collect()
}

/// Chunk all documents. Returns passages from all documents in order.
pub fn chunk_documents(docs: &[Document], policy: ChunkPolicy) -> Vec<Passage> {
    docs.iter().flat_map(|d| chunk_document(d, policy)).collect()
}

fn split_text(text: &str, policy: ChunkPolicy) -> Vec<String> {
    match policy {
        ChunkPolicy::Words { max_words } => split_by_words(text, max_words),
        ChunkPolicy::Paragraphs => split_by_paragraphs(text),
    }
}

/// Windows of at most `max_words` words. A zero budget degenerates to one
/// passage per document.
fn split_by_words(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }
    if max_words == 0 {
        return vec![words.join(" ")];
    }
    words.chunks(max_words).map(|w| w.join(" ")).collect()
}

fn split_by_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            id: "test.txt".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn chunk_short_document() {
        let d = doc("mean is the average");
        let p = chunk_document(&d, ChunkPolicy::Words { max_words: 200 });
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].text, "mean is the average");
        assert_eq!(p[0].sequence_index, 0);
        assert_eq!(p[0].source_id.as_deref(), Some("test.txt"));
    }

    #[test]
    fn chunk_by_word_budget() {
        let d = doc("one two three four five six seven");
        let p = chunk_document(&d, ChunkPolicy::Words { max_words: 3 });
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].text, "one two three");
        assert_eq!(p[1].text, "four five six");
        // final passage may be shorter than the budget
        assert_eq!(p[2].text, "seven");
    }

    #[test]
    fn chunk_covers_all_words() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let p = chunk_document(&doc(text), ChunkPolicy::Words { max_words: 4 });
        let rejoined: Vec<String> = p
            .iter()
            .flat_map(|c| c.text.split_whitespace().map(str::to_string))
            .collect();
        let original: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn chunk_is_deterministic() {
        let d = doc("a b c d e f g h i j");
        let policy = ChunkPolicy::Words { max_words: 3 };
        assert_eq!(chunk_document(&d, policy), chunk_document(&d, policy));
    }

    #[test]
    fn chunk_by_paragraphs() {
        let d = doc("P1 line.\n\nP2 line.\n\nP3 line.");
        let p = chunk_document(&d, ChunkPolicy::Paragraphs);
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].text, "P1 line.");
        assert_eq!(p[2].text, "P3 line.");
        assert_eq!(p[2].sequence_index, 2);
    }

    #[test]
    fn chunk_empty_document() {
        assert!(chunk_document(&doc(""), ChunkPolicy::default()).is_empty());
        assert!(chunk_document(&doc("  \n\n  "), ChunkPolicy::Paragraphs).is_empty());
    }

    #[test]
    fn zero_word_budget_keeps_whole_document() {
        let d = doc("one two three");
        let p = chunk_document(&d, ChunkPolicy::Words { max_words: 0 });
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].text, "one two three");
    }
}
