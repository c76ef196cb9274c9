pub mod chunking;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod models;
pub mod pipeline;

pub use chunking::{chunk_by_sentence, normalize_text, split_sentences, ChunkingConfig};
pub use error::{ExtractError, GenerateError, QuizError};
pub use extractor::{collect_raw_text, extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use generator::{
    DevicePreference, GeneratorConfig, QuestionGenerator, T5QuestionGenerator, DEFAULT_MODEL_ID,
    DEFAULT_REVISION,
};
pub use models::{DocumentFingerprint, QuestionReport, QuizOptions};
pub use pipeline::{
    build_document_fingerprint, collect_questions, digest_file, generate_questions_from_pdf,
};
