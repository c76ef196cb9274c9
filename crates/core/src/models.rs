use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance for a processed PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFingerprint {
    pub document_id: String,
    pub document_title: String,
    pub source_path: String,
    pub checksum: String,
    pub extracted_at: DateTime<Utc>,
}

/// Result of a full pipeline run over one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReport {
    pub document: DocumentFingerprint,
    pub page_count: usize,
    pub chunk_count: usize,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QuizOptions {
    /// Approximate word budget per model input chunk.
    pub max_chunk_words: usize,
    /// Upper bound on the final question list.
    pub max_questions: usize,
    /// Candidate questions requested from the model per chunk.
    pub questions_per_chunk: usize,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            max_chunk_words: 512,
            max_questions: 5,
            questions_per_chunk: 2,
        }
    }
}
