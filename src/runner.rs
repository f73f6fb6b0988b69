//! End-to-end pipeline: load records, generate answers, judge them.

use crate::dataset::{Record, load_records};
use crate::error::{EvalError, Result};
use crate::evaluate::evaluate;
use crate::generator::Generator;
use crate::judge::Judge;
use crate::metric::GEval;
use crate::report::EvaluationReport;
use crate::test_case::TestCase;
use std::path::Path;
use tracing::{debug, info};

/// Sequential generate-then-judge pipeline.
pub struct Pipeline<G, J> {
    generator: G,
    judge: J,
    metrics: Vec<GEval>,
}

impl<G: Generator, J: Judge> Pipeline<G, J> {
    /// Create a new pipeline.
    pub fn new(generator: G, judge: J, metrics: Vec<GEval>) -> Self {
        Self {
            generator,
            judge,
            metrics,
        }
    }

    /// Generate an answer for each record, one request at a time.
    pub async fn generate_test_cases(&self, records: &[Record]) -> Result<Vec<TestCase>> {
        let mut cases = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            debug!(index = idx, total = records.len(), "generating answer");
            let actual = self.generator.generate(&record.input).await?;
            cases.push(TestCase::from_record(record, actual));
        }

        Ok(cases)
    }

    /// Generate answers for `records`, then judge them all.
    pub async fn run(&self, records: &[Record]) -> Result<EvaluationReport> {
        info!(records = records.len(), "generating answers");
        let cases = self.generate_test_cases(records).await?;
        evaluate(&cases, &self.metrics, &self.judge).await
    }

    /// Load a JSONL dataset and run the pipeline over it.
    pub async fn run_file(&self, path: &Path) -> Result<EvaluationReport> {
        let records = load_records(path)?;
        if records.is_empty() {
            return Err(EvalError::EmptyDataset(path.to_path_buf()));
        }
        self.run(&records).await
    }
}
