use chrono::Utc;
use clap::{Parser, ValueEnum};
use pdf_quizgen_core::{
    generate_questions_from_pdf, DevicePreference, GeneratorConfig, QuizOptions,
    T5QuestionGenerator, DEFAULT_MODEL_ID, DEFAULT_REVISION,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-quizgen", version, about = "Generate assignment-style questions from a PDF")]
struct Cli {
    /// PDF file to generate questions from.
    pdf: PathBuf,

    /// Maximum number of questions to produce.
    #[arg(long, default_value = "5")]
    max_questions: usize,

    /// Approximate word budget per model input chunk.
    #[arg(long, default_value = "512")]
    chunk_words: usize,

    /// Candidate questions requested from the model per chunk.
    #[arg(long, default_value = "2")]
    per_chunk: usize,

    /// Hugging Face model id of the question-generation checkpoint.
    #[arg(long, default_value = DEFAULT_MODEL_ID)]
    model_id: String,

    /// Model revision to fetch.
    #[arg(long, default_value = DEFAULT_REVISION)]
    revision: String,

    /// Compute device for inference.
    #[arg(long, value_enum, default_value = "auto")]
    device: DeviceArg,

    /// Sampling temperature for candidates after the first one.
    #[arg(long, default_value = "0.7")]
    temperature: f64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeviceArg {
    Auto,
    Cpu,
    Cuda,
}

impl From<DeviceArg> for DevicePreference {
    fn from(value: DeviceArg) -> Self {
        match value {
            DeviceArg::Auto => DevicePreference::Auto,
            DeviceArg::Cpu => DevicePreference::Cpu,
            DeviceArg::Cuda => DevicePreference::Cuda,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            std::process::exit(if error.use_stderr() { 1 } else { 0 });
        }
    };

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "pdf-quizgen boot"
    );

    let generator_config = GeneratorConfig {
        model_id: cli.model_id,
        revision: cli.revision,
        device: cli.device.into(),
        temperature: cli.temperature,
        ..GeneratorConfig::default()
    };
    let options = QuizOptions {
        max_chunk_words: cli.chunk_words,
        max_questions: cli.max_questions,
        questions_per_chunk: cli.per_chunk,
    };

    info!(model_id = %generator_config.model_id, "loading question-generation model");
    let mut generator = T5QuestionGenerator::load(generator_config)?;
    info!(device = ?generator.device(), "device selected");

    info!(path = %cli.pdf.display(), "extracting and chunking document text");
    let report = generate_questions_from_pdf(&cli.pdf, &mut generator, &options)?;
    info!(
        pages = report.page_count,
        chunks = report.chunk_count,
        questions = report.questions.len(),
        "generation complete"
    );

    println!("\nGenerated Assignment Questions:");
    for (index, question) in report.questions.iter().enumerate() {
        println!("{}. {}", index + 1, question);
    }

    Ok(())
}
