//! G-Eval style metrics: an LLM judge grades a test case against
//! natural-language evaluation steps.

use crate::error::{EvalError, Result};
use crate::judge::Judge;
use crate::llm::Prompts;
use crate::test_case::{TestCase, TestCaseParam};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Highest score the judge may return.
const MAX_RAW_SCORE: f64 = 10.0;

/// Pass threshold applied when strict mode is on.
const STRICT_THRESHOLD: f64 = 1.0;

/// A scoring rule evaluated by a judge model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GEval {
    /// Metric name shown in reports.
    pub name: String,
    /// Judge model identifier.
    pub model: String,
    /// Test case fields the judge sees, in prompt order.
    pub params: Vec<TestCaseParam>,
    /// Instructions the judge follows, in order.
    pub steps: Vec<String>,
    /// Minimum normalized score for a pass.
    pub threshold: f64,
    /// Binary grading; the effective threshold becomes 1.0.
    #[serde(default)]
    pub strict: bool,
}

/// Outcome of one metric on one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub name: String,
    /// Normalized score in [0, 1].
    pub score: f64,
    pub threshold: f64,
    pub success: bool,
    pub reason: String,
    pub evaluation_model: String,
    pub strict: bool,
}

impl GEval {
    /// Create a metric with no steps, inspecting input and actual output.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            params: vec![TestCaseParam::Input, TestCaseParam::ActualOutput],
            steps: Vec::new(),
            threshold: 0.5,
            strict: false,
        }
    }

    /// Semantic correctness of the actual output against the expected output.
    pub fn correctness(model: impl Into<String>) -> Self {
        Self::new("Correctness", model)
            .with_params([TestCaseParam::ExpectedOutput, TestCaseParam::ActualOutput])
            .with_steps([
                "Decide whether the actual output has the same meaning as the expected output.",
                "Ignore trivial differences in casing and punctuation.",
            ])
            .with_threshold(0.5)
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = TestCaseParam>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    pub fn with_steps<S: Into<String>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Threshold actually applied when marking pass/fail.
    pub fn effective_threshold(&self) -> f64 {
        if self.strict {
            STRICT_THRESHOLD
        } else {
            self.threshold
        }
    }

    /// Check that the metric can be evaluated.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| EvalError::InvalidMetric {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("judge model must not be empty"));
        }
        if self.params.is_empty() {
            return Err(invalid("at least one test case field is required"));
        }
        if self.steps.is_empty() {
            return Err(invalid("at least one evaluation step is required"));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(invalid("threshold must be within [0, 1]"));
        }
        Ok(())
    }

    /// Render the judge prompt for a test case.
    pub fn render_prompt(&self, case: &TestCase) -> String {
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect::<Vec<_>>()
            .join("\n");

        let test_case = self
            .params
            .iter()
            .map(|param| format!("{}:\n{}", param.label(), case.get(*param)))
            .collect::<Vec<_>>()
            .join("\n\n");

        let parameters = self
            .params
            .iter()
            .map(TestCaseParam::label)
            .collect::<Vec<_>>()
            .join(", ");

        let scale = if self.strict {
            Prompts::strict_scale()
        } else {
            Prompts::graded_scale()
        };

        Prompts::fill(
            Prompts::geval_evaluation(),
            &[
                ("steps", steps.as_str()),
                ("test_case", test_case.as_str()),
                ("parameters", parameters.as_str()),
                ("scale", scale),
            ],
        )
    }

    /// Map a raw 0-10 judge score into [0, 1].
    pub fn normalize_score(&self, raw: f64) -> f64 {
        let score = (raw / MAX_RAW_SCORE).clamp(0.0, 1.0);
        if self.strict {
            if score >= 1.0 { 1.0 } else { 0.0 }
        } else {
            score
        }
    }

    /// Grade one test case with a single judge call.
    pub async fn measure(&self, case: &TestCase, judge: &dyn Judge) -> Result<MetricResult> {
        let prompt = self.render_prompt(case);
        let verdict = judge.judge(&self.model, &prompt).await?;

        let score = self.normalize_score(verdict.score);
        let threshold = self.effective_threshold();
        let success = score >= threshold;

        debug!(
            metric = %self.name,
            raw_score = verdict.score,
            score,
            success,
            "measured test case"
        );

        Ok(MetricResult {
            name: self.name.clone(),
            score,
            threshold,
            success,
            reason: verdict.reason,
            evaluation_model: self.model.clone(),
            strict: self.strict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::Verdict;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed verdict and records every prompt it sees.
    struct FixedJudge {
        verdict: Verdict,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl FixedJudge {
        fn new(score: f64) -> Self {
            Self {
                verdict: Verdict::new(score, "fixed"),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Judge for FixedJudge {
        async fn judge(&self, model: &str, prompt: &str) -> Result<Verdict> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            Ok(self.verdict.clone())
        }
    }

    #[test]
    fn test_correctness_definition() {
        let metric = GEval::correctness("gpt-4o-mini");
        assert_eq!(metric.name, "Correctness");
        assert_eq!(metric.model, "gpt-4o-mini");
        assert_eq!(
            metric.params,
            vec![TestCaseParam::ExpectedOutput, TestCaseParam::ActualOutput]
        );
        assert_eq!(metric.steps.len(), 2);
        assert_eq!(metric.threshold, 0.5);
        assert!(!metric.strict);
        assert!(metric.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_metrics() {
        assert!(GEval::new("Empty", "m").validate().is_err());
        assert!(GEval::correctness("m").with_threshold(1.2).validate().is_err());
        assert!(GEval::correctness("").validate().is_err());
        assert!(GEval::correctness("m").with_params(Vec::new()).validate().is_err());
    }

    #[test]
    fn test_prompt_contains_only_selected_fields() {
        let metric = GEval::correctness("m");
        let case = TestCase::new("SECRET INPUT", "Paris", "Lyon");
        let prompt = metric.render_prompt(&case);

        assert!(prompt.contains("Expected Output:\nParis"));
        assert!(prompt.contains("Actual Output:\nLyon"));
        assert!(!prompt.contains("SECRET INPUT"));
        assert!(prompt.contains("1. Decide whether"));
        assert!(prompt.contains("2. Ignore trivial"));
        assert!(!prompt.contains("{steps}"));
        assert!(!prompt.contains("{scale}"));
    }

    #[test]
    fn test_placeholder_text_in_outputs_reaches_judge_verbatim() {
        let metric = GEval::correctness("m");
        let case = TestCase::new("q", "Use {scale} here", "Answer: {parameters}");
        let prompt = metric.render_prompt(&case);

        assert!(prompt.contains("Expected Output:\nUse {scale} here"));
        assert!(prompt.contains("Actual Output:\nAnswer: {parameters}"));
    }

    #[test]
    fn test_placeholder_text_in_steps_is_kept() {
        let metric = GEval::correctness("m").with_steps(["Quote {test_case} literally."]);
        let prompt = metric.render_prompt(&TestCase::new("q", "a", "b"));
        assert!(prompt.contains("1. Quote {test_case} literally."));
    }

    #[test]
    fn test_strict_prompt_uses_binary_scale() {
        let case = TestCase::new("q", "a", "b");

        let graded = GEval::correctness("m").render_prompt(&case);
        assert!(graded.contains(Prompts::graded_scale()));
        assert!(!graded.contains(Prompts::strict_scale()));

        let strict = GEval::correctness("m").strict(true).render_prompt(&case);
        assert!(strict.contains(Prompts::strict_scale()));
        assert!(!strict.contains(Prompts::graded_scale()));
    }

    #[test]
    fn test_normalize_score() {
        let metric = GEval::correctness("m");
        assert_eq!(metric.normalize_score(10.0), 1.0);
        assert_eq!(metric.normalize_score(5.0), 0.5);
        assert_eq!(metric.normalize_score(-3.0), 0.0);
        assert_eq!(metric.normalize_score(42.0), 1.0);

        let strict = metric.strict(true);
        assert_eq!(strict.normalize_score(9.0), 0.0);
        assert_eq!(strict.normalize_score(10.0), 1.0);
    }

    #[tokio::test]
    async fn test_exact_match_passes() {
        let judge = FixedJudge::new(10.0);
        let metric = GEval::correctness("judge-model");
        let result = metric
            .measure(&TestCase::new("What is 2+2?", "4", "4"), &judge)
            .await
            .unwrap();

        assert_eq!(result.score, 1.0);
        assert!(result.success);
        assert_eq!(result.evaluation_model, "judge-model");

        let prompts = judge.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "judge-model");
    }

    #[tokio::test]
    async fn test_unrelated_answer_fails() {
        let judge = FixedJudge::new(0.0);
        let result = GEval::correctness("m")
            .measure(&TestCase::new("Capital of France?", "Paris", "Lyon"), &judge)
            .await
            .unwrap();

        assert!(result.score < 0.5);
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_score_at_threshold_passes() {
        let judge = FixedJudge::new(5.0);
        let result = GEval::correctness("m")
            .measure(&TestCase::new("q", "a", "a-ish"), &judge)
            .await
            .unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_strict_mode_requires_full_marks() {
        let judge = FixedJudge::new(8.0);
        let result = GEval::correctness("m")
            .strict(true)
            .measure(&TestCase::new("q", "a", "b"), &judge)
            .await
            .unwrap();

        assert_eq!(result.threshold, 1.0);
        assert_eq!(result.score, 0.0);
        assert!(!result.success);
    }
}
