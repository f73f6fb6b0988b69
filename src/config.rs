//! Configuration for the evaluator.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default model used for both generation and judging.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default location of the labeled dataset.
pub const DEFAULT_DATASET_PATH: &str = "data/tiny_eval_dataset.jsonl";

/// Default pass threshold for the correctness metric.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Connection and sampling settings for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the LLM API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gpt-4o-mini")
    pub model: String,

    /// Maximum tokens for response. Omitted from requests when unset.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_temperature() -> f32 {
    0.0
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: default_temperature(),
        }
    }
}

/// Settings for the evaluation run itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSettings {
    /// JSONL dataset with one `{"input", "ideal"}` object per line.
    pub dataset: PathBuf,

    /// Pass threshold in [0, 1].
    pub threshold: f64,

    /// Ask the judge for a binary verdict.
    #[serde(default)]
    pub strict: bool,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
            threshold: DEFAULT_THRESHOLD,
            strict: false,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Model that answers the dataset prompts
    pub generator: LlmConfig,
    /// Model that grades the answers
    pub judge: LlmConfig,
    /// Dataset and threshold
    pub eval: EvalSettings,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    models: Option<ModelsFileSection>,
    eval: Option<EvalFileSection>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ModelsFileSection {
    generator: Option<String>,
    judge: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EvalFileSection {
    dataset: Option<PathBuf>,
    threshold: Option<f64>,
    strict: Option<bool>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_API_BASE, LLM_API_KEY, GEN_MODEL, ...)
    /// 2. Config file (~/.config/correctness-eval/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, filling gaps with defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file_config: ConfigFile = serde_yaml::from_str(content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(api_base) = llm.api_base {
                config.set_api_base(api_base);
            }
            if let Some(api_key) = llm.api_key {
                config.set_api_key(api_key);
            }
            if let Some(max_tokens) = llm.max_tokens {
                config.generator.max_tokens = Some(max_tokens);
                config.judge.max_tokens = Some(max_tokens);
            }
        }

        if let Some(models) = file_config.models {
            if let Some(model) = models.generator {
                config.generator.model = model;
            }
            if let Some(model) = models.judge {
                config.judge.model = model;
            }
        }

        if let Some(eval) = file_config.eval {
            if let Some(dataset) = eval.dataset {
                config.eval.dataset = dataset;
            }
            if let Some(threshold) = eval.threshold {
                config.eval.threshold = threshold;
            }
            if let Some(strict) = eval.strict {
                config.eval.strict = strict;
            }
        }

        Ok(config)
    }

    /// Override values from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("LLM_API_BASE") {
            self.set_api_base(api_base);
        }

        if let Some(api_key) = lookup("LLM_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.set_api_key(api_key);
        }

        if let Some(model) = lookup("GEN_MODEL") {
            self.generator.model = model;
        }

        if let Some(model) = lookup("JUDGE_MODEL") {
            self.judge.model = model;
        }

        if let Some(dataset) = lookup("EVAL_DATASET") {
            self.eval.dataset = PathBuf::from(dataset);
        }

        if let Some(threshold) = lookup("EVAL_THRESHOLD") {
            match threshold.parse() {
                Ok(value) => self.eval.threshold = value,
                Err(_) => warn!(value = %threshold, "ignoring unparseable EVAL_THRESHOLD"),
            }
        }
    }

    fn set_api_base(&mut self, api_base: String) {
        self.judge.api_base = api_base.clone();
        self.generator.api_base = api_base;
    }

    fn set_api_key(&mut self, api_key: String) {
        self.judge.api_key = api_key.clone();
        self.generator.api_key = api_key;
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "correctness-eval")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    pub fn validate(&self) -> Result<()> {
        for (role, llm) in [("generator", &self.generator), ("judge", &self.judge)] {
            if llm.api_base.is_empty() {
                return Err(EvalError::Config(format!(
                    "{} API base URL is required. Set LLM_API_BASE environment variable or add to config file.",
                    role
                )));
            }

            if llm.api_key.is_empty() {
                return Err(EvalError::Config(format!(
                    "{} API key is required. Set LLM_API_KEY environment variable or add to config file.",
                    role
                )));
            }

            if llm.model.is_empty() {
                return Err(EvalError::Config(format!(
                    "{} model is required. Set GEN_MODEL / JUDGE_MODEL or add to config file.",
                    role
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.eval.threshold) {
            return Err(EvalError::Config(format!(
                "Threshold must be within [0, 1], got {}",
                self.eval.threshold
            )));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_llm(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut config = Config::default();
        config.set_api_base(api_base.into());
        config.set_api_key(api_key.into());
        config
    }
}
