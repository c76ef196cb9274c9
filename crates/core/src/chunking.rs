use crate::models::QuizOptions;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub max_words: usize,
}

impl From<QuizOptions> for ChunkingConfig {
    fn from(value: QuizOptions) -> Self {
        Self {
            max_words: value.max_chunk_words,
        }
    }
}

static SENTENCE_BOUNDARY: OnceLock<Regex> = OnceLock::new();

// A sentence ends at `.`, `?` or `!` followed by whitespace. `3.14` and
// similar mid-token punctuation never match.
fn sentence_boundary() -> &'static Regex {
    SENTENCE_BOUNDARY
        .get_or_init(|| Regex::new(r"[.?!]\s+").expect("sentence boundary pattern is valid"))
}

/// Collapse all whitespace runs (newlines included) to single spaces and
/// trim the ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into sentences, keeping the terminator attached.
/// Text after the last terminator is returned as a final sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in sentence_boundary().find_iter(text) {
        let end = boundary.start() + 1;
        sentences.push(&text[start..end]);
        start = boundary.end();
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

/// Greedily pack whole sentences into chunks of at most `max_words` words.
/// A single sentence over the budget becomes its own oversized chunk; a
/// sentence is never split.
pub fn chunk_by_sentence(normalized: &str, config: ChunkingConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_words = 0usize;

    for sentence in split_sentences(normalized) {
        let sentence_words = sentence.split_whitespace().count();

        if current.is_empty() {
            current.push_str(sentence);
            current_words = sentence_words;
            continue;
        }

        if current_words + sentence_words <= config.max_words {
            current.push(' ');
            current.push_str(sentence);
            current_words += sentence_words;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_words = sentence_words;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
