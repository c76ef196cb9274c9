use crate::error::GenerateError;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::PathBuf;
use tokenizers::Tokenizer;

pub const DEFAULT_MODEL_ID: &str = "valhalla/t5-base-qg-hl";
pub const DEFAULT_REVISION: &str = "main";

const PROMPT_PREFIX: &str = "generate questions: ";

/// Where inference runs. Resolved once at load time so the choice is an
/// explicit input rather than ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreference {
    /// CUDA when available, CPU otherwise.
    Auto,
    Cpu,
    Cuda,
}

impl DevicePreference {
    pub fn resolve(self) -> Result<Device, GenerateError> {
        match self {
            DevicePreference::Cpu => Ok(Device::Cpu),
            DevicePreference::Cuda => {
                Device::new_cuda(0).map_err(|error| GenerateError::Device(error.to_string()))
            }
            DevicePreference::Auto => {
                if candle_core::utils::cuda_is_available() {
                    Device::new_cuda(0).map_err(|error| GenerateError::Device(error.to_string()))
                } else {
                    Ok(Device::Cpu)
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Hugging Face model id of the question-generation checkpoint.
    pub model_id: String,
    pub revision: String,
    pub device: DevicePreference,
    /// Token budget for the encoded prompt; longer inputs are truncated.
    pub max_input_tokens: usize,
    /// Decoding stops after this many generated tokens even without EOS.
    pub max_new_tokens: usize,
    /// Sampling temperature for candidates after the first (greedy) one.
    pub temperature: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            device: DevicePreference::Auto,
            max_input_tokens: 512,
            max_new_tokens: 64,
            temperature: 0.7,
            seed: 299_792_458,
        }
    }
}

/// The question-generation capability: a chunk of document text in, a small
/// set of candidate questions out.
pub trait QuestionGenerator {
    fn generate(&mut self, chunk: &str, count: usize) -> Result<Vec<String>, GenerateError>;
}

struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

fn fetch_model_files(config: &GeneratorConfig) -> Result<ModelFiles, GenerateError> {
    let api = Api::new()?;
    let repo = api.repo(Repo::with_revision(
        config.model_id.clone(),
        RepoType::Model,
        config.revision.clone(),
    ));

    Ok(ModelFiles {
        config: repo.get("config.json")?,
        tokenizer: repo.get("tokenizer.json")?,
        weights: repo.get("model.safetensors")?,
    })
}

/// T5 conditional generation on candle, loaded from the Hugging Face hub.
pub struct T5QuestionGenerator {
    model: t5::T5ForConditionalGeneration,
    model_config: t5::Config,
    tokenizer: Tokenizer,
    device: Device,
    options: GeneratorConfig,
}

impl T5QuestionGenerator {
    pub fn load(options: GeneratorConfig) -> Result<Self, GenerateError> {
        let device = options.device.resolve()?;
        let files = fetch_model_files(&options)?;

        let model_config: t5::Config =
            serde_json::from_str(&std::fs::read_to_string(&files.config)?)?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|error| GenerateError::Tokenizer(error.to_string()))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights], DType::F32, &device)?
        };
        let model = t5::T5ForConditionalGeneration::load(vb, &model_config)?;

        Ok(Self {
            model,
            model_config,
            tokenizer,
            device,
            options,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn model_id(&self) -> &str {
        &self.options.model_id
    }

    fn encode_prompt(&self, chunk: &str) -> Result<Tensor, GenerateError> {
        let prompt = format!("{PROMPT_PREFIX}{chunk}");
        let encoding = self
            .tokenizer
            .encode(prompt.as_str(), true)
            .map_err(|error| GenerateError::Tokenizer(error.to_string()))?;

        let mut token_ids = encoding.get_ids().to_vec();
        token_ids.truncate(self.options.max_input_tokens);

        Ok(Tensor::new(token_ids.as_slice(), &self.device)?.unsqueeze(0)?)
    }

    fn decode_sequence(
        &mut self,
        input_ids: &Tensor,
        processor: &mut LogitsProcessor,
    ) -> Result<Vec<u32>, GenerateError> {
        self.model.clear_kv_cache();
        let encoder_output = self.model.encode(input_ids)?;

        let start_token = self
            .model_config
            .decoder_start_token_id
            .unwrap_or(self.model_config.pad_token_id) as u32;
        let mut output_ids = vec![start_token];

        for step in 0..self.options.max_new_tokens {
            let decoder_tokens = if step == 0 || !self.model_config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = [output_ids[output_ids.len() - 1]];
                Tensor::new(&last[..], &self.device)?.unsqueeze(0)?
            };

            let logits = self
                .model
                .decode(&decoder_tokens, &encoder_output)?
                .squeeze(0)?;
            let next_token = processor.sample(&logits)?;

            if next_token as usize == self.model_config.eos_token_id {
                break;
            }
            output_ids.push(next_token);
        }

        Ok(output_ids.split_off(1))
    }
}

impl QuestionGenerator for T5QuestionGenerator {
    fn generate(&mut self, chunk: &str, count: usize) -> Result<Vec<String>, GenerateError> {
        let input_ids = self.encode_prompt(chunk)?;
        let mut questions = Vec::with_capacity(count);

        for sequence in 0..count {
            // First candidate is greedy, later ones sample for variety.
            let temperature = if sequence == 0 {
                None
            } else {
                Some(self.options.temperature)
            };
            let mut processor = LogitsProcessor::new(
                self.options.seed.wrapping_add(sequence as u64),
                temperature,
                None,
            );

            let output_ids = self.decode_sequence(&input_ids, &mut processor)?;
            let text = self
                .tokenizer
                .decode(&output_ids, true)
                .map_err(|error| GenerateError::Tokenizer(error.to_string()))?;

            let text = text.trim().to_string();
            if !text.is_empty() {
                questions.push(text);
            }
        }

        Ok(questions)
    }
}
