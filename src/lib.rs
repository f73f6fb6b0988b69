//! Correctness Eval - grade model answers against a labeled dataset with an
//! LLM judge.
//!
//! # Overview
//!
//! The evaluation runs three sequential stages:
//! 1. Load `{"input", "ideal"}` records from a JSON Lines file
//! 2. Generate an answer for every input at temperature zero
//! 3. Ask a judge model to grade each answer against the ideal, using
//!    natural-language evaluation steps and a pass threshold
//!
//! # Quick Start
//!
//! ```no_run
//! use correctness_eval::{
//!     config::Config,
//!     generator::LlmGenerator,
//!     judge::LlmJudge,
//!     metric::GEval,
//!     runner::Pipeline,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let metric = GEval::correctness(config.judge.model.clone())
//!         .with_threshold(config.eval.threshold);
//!
//!     let pipeline = Pipeline::new(
//!         LlmGenerator::from_config(config.generator.clone()),
//!         LlmJudge::from_config(config.judge.clone()),
//!         vec![metric],
//!     );
//!
//!     let report = pipeline.run_file(&config.eval.dataset).await?;
//!     report.print();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Record**: one labeled example from the dataset
//! - **Generator**: produces the answer under test
//! - **TestCase**: record plus generated answer
//! - **GEval**: judge-backed metric with steps and threshold
//! - **Judge**: model call that grades a rendered prompt
//! - **EvaluationReport**: per-case outcomes and aggregate summary

pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod generator;
pub mod judge;
pub mod llm;
pub mod metric;
pub mod report;
pub mod runner;
pub mod test_case;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{Record, load_records};
pub use error::{EvalError, Result};
pub use evaluate::evaluate;
pub use generator::{Generator, LlmGenerator};
pub use judge::{Judge, LlmJudge, Verdict};
pub use llm::LlmClient;
pub use metric::{GEval, MetricResult};
pub use report::{EvaluationReport, Summary, TestResult};
pub use runner::Pipeline;
pub use test_case::{TestCase, TestCaseParam};
