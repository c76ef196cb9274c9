use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("model download error: {0}")]
    Download(#[from] hf_hub::api::sync::ApiError),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("model error: {0}")]
    Model(#[from] candle_core::Error),

    #[error("model config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("compute device unavailable: {0}")]
    Device(String),
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("question generation failed: {0}")]
    Generate(#[from] GenerateError),
}

pub type Result<T, E = QuizError> = std::result::Result<T, E>;
