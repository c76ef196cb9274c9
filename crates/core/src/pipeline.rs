use crate::chunking::{chunk_by_sentence, normalize_text, ChunkingConfig};
use crate::error::{ExtractError, GenerateError, QuizError};
use crate::extractor::{collect_raw_text, extract_page_texts};
use crate::generator::QuestionGenerator;
use crate::models::{DocumentFingerprint, QuestionReport, QuizOptions};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub fn digest_file(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn build_document_fingerprint(path: &Path) -> Result<DocumentFingerprint, ExtractError> {
    let checksum = digest_file(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ExtractError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

    Ok(DocumentFingerprint {
        document_id: generate_document_id(path),
        document_title: name.to_string(),
        source_path: path.to_string_lossy().to_string(),
        checksum,
        extracted_at: Utc::now(),
    })
}

/// Walk chunks in order, collecting unique candidate questions until the
/// list is full. Chunks after that point are never sent to the model.
pub fn collect_questions<G: QuestionGenerator>(
    generator: &mut G,
    chunks: &[String],
    options: &QuizOptions,
) -> Result<Vec<String>, GenerateError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut questions = Vec::new();

    for chunk in chunks {
        if questions.len() >= options.max_questions {
            break;
        }

        for candidate in generator.generate(chunk, options.questions_per_chunk)? {
            if questions.len() >= options.max_questions {
                break;
            }
            // Exact string match only; no case or punctuation folding.
            if seen.insert(candidate.clone()) {
                questions.push(candidate);
            }
        }
    }

    Ok(questions)
}

/// Full run over one document: extract, normalize, chunk, generate.
pub fn generate_questions_from_pdf<G: QuestionGenerator>(
    path: &Path,
    generator: &mut G,
    options: &QuizOptions,
) -> Result<QuestionReport, QuizError> {
    let document = build_document_fingerprint(path)?;
    let pages = extract_page_texts(path)?;
    let page_count = pages.len();

    let raw_text = collect_raw_text(&pages);
    let normalized = normalize_text(&raw_text);
    let chunks = chunk_by_sentence(&normalized, ChunkingConfig::from(options.clone()));

    let questions = collect_questions(generator, &chunks, options)?;

    Ok(QuestionReport {
        document,
        page_count,
        chunk_count: chunks.len(),
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::{build_document_fingerprint, collect_questions, digest_file};
    use crate::error::{ExtractError, GenerateError};
    use crate::generator::QuestionGenerator;
    use crate::models::QuizOptions;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// Replays a fixed response per call and counts how often it was asked.
    struct ScriptedGenerator {
        responses: Vec<Vec<String>>,
        calls: usize,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Vec<&str>>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|batch| batch.into_iter().map(str::to_string).collect())
                    .collect(),
                calls: 0,
            }
        }
    }

    impl QuestionGenerator for ScriptedGenerator {
        fn generate(&mut self, _chunk: &str, _count: usize) -> Result<Vec<String>, GenerateError> {
            let batch = self.responses.get(self.calls).cloned().unwrap_or_default();
            self.calls += 1;
            Ok(batch)
        }
    }

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn duplicate_questions_are_dropped() {
        let mut generator = ScriptedGenerator::new(vec![
            vec!["What is a cell?", "What is a cell?"],
            vec!["What is a cell?", "What is mitosis?"],
        ]);
        let options = QuizOptions::default();

        let questions =
            collect_questions(&mut generator, &chunks(&["one", "two"]), &options).unwrap();

        assert_eq!(questions, vec!["What is a cell?", "What is mitosis?"]);
    }

    #[test]
    fn question_list_is_capped() {
        let mut generator = ScriptedGenerator::new(vec![
            vec!["q1", "q2", "q3"],
            vec!["q4", "q5", "q6", "q7"],
        ]);
        let options = QuizOptions::default();

        let questions =
            collect_questions(&mut generator, &chunks(&["one", "two"]), &options).unwrap();

        assert_eq!(questions.len(), options.max_questions);
        assert_eq!(questions, vec!["q1", "q2", "q3", "q4", "q5"]);
    }

    #[test]
    fn remaining_chunks_are_skipped_once_full() {
        let mut generator = ScriptedGenerator::new(vec![
            vec!["q1", "q2", "q3", "q4", "q5"],
            vec!["never requested"],
        ]);
        let options = QuizOptions::default();

        let questions =
            collect_questions(&mut generator, &chunks(&["one", "two", "three"]), &options)
                .unwrap();

        assert_eq!(questions.len(), 5);
        assert_eq!(generator.calls, 1);
    }

    #[test]
    fn no_chunks_means_no_questions_and_no_model_calls() {
        let mut generator = ScriptedGenerator::new(vec![vec!["unused"]]);
        let options = QuizOptions::default();

        let questions = collect_questions(&mut generator, &[], &options).unwrap();

        assert!(questions.is_empty());
        assert_eq!(generator.calls, 0);
    }

    #[test]
    fn dedup_is_literal_exact_match() {
        let mut generator = ScriptedGenerator::new(vec![vec![
            "What is DNA?",
            "what is dna?",
            "What is DNA",
        ]]);
        let options = QuizOptions::default();

        let questions = collect_questions(&mut generator, &chunks(&["one"]), &options).unwrap();

        // Case and punctuation variants are distinct entries.
        assert_eq!(questions.len(), 3);
    }

    #[test]
    fn checksum_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("a.pdf");
        fs::write(&file_path, b"abc")?;

        let first = digest_file(&file_path)?;
        let second = digest_file(&file_path)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn fingerprint_records_title_and_checksum() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("biology-notes.pdf");
        fs::write(&file_path, b"%PDF-1.4\n%fake")?;

        let fingerprint = build_document_fingerprint(&file_path)?;
        assert_eq!(fingerprint.document_title, "biology-notes.pdf");
        assert!(!fingerprint.checksum.is_empty());
        assert!(!fingerprint.document_id.is_empty());
        Ok(())
    }

    #[test]
    fn missing_file_fails_fingerprinting() {
        let result = build_document_fingerprint(Path::new("/nonexistent/input.pdf"));
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }
}
