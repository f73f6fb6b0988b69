//! Runs test cases through metrics.

use crate::error::Result;
use crate::judge::Judge;
use crate::metric::GEval;
use crate::report::{EvaluationReport, TestResult};
use crate::test_case::TestCase;
use std::time::Instant;
use tracing::{debug, info};

/// Grade every test case with every metric.
///
/// Cases and metrics are processed in order, one judge call per
/// (case, metric) pair. The first failure aborts the evaluation.
pub async fn evaluate(
    cases: &[TestCase],
    metrics: &[GEval],
    judge: &dyn Judge,
) -> Result<EvaluationReport> {
    for metric in metrics {
        metric.validate()?;
    }

    let start = Instant::now();
    info!(cases = cases.len(), metrics = metrics.len(), "evaluating test cases");

    let mut results = Vec::with_capacity(cases.len());
    for (idx, case) in cases.iter().enumerate() {
        let mut metric_results = Vec::with_capacity(metrics.len());
        for metric in metrics {
            metric_results.push(metric.measure(case, judge).await?);
        }

        let result = TestResult::new(idx, case, metric_results);
        debug!(case = %result.name, success = result.success, "judged test case");
        results.push(result);
    }

    Ok(EvaluationReport::new(
        results,
        start.elapsed().as_secs_f64(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::judge::Verdict;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores 10 when the actual output equals the expected output, else 0.
    struct EchoJudge {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Judge for EchoJudge {
        async fn judge(&self, _model: &str, prompt: &str) -> Result<Verdict> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let field = |label: &str| {
                prompt
                    .split(&format!("{}:\n", label))
                    .nth(1)
                    .and_then(|rest| rest.lines().next())
                    .map(str::to_string)
            };
            let score = if field("Expected Output") == field("Actual Output") {
                10.0
            } else {
                0.0
            };
            Ok(Verdict::new(score, "echo"))
        }
    }

    struct FailingJudge;

    #[async_trait]
    impl Judge for FailingJudge {
        async fn judge(&self, _model: &str, _prompt: &str) -> Result<Verdict> {
            Err(EvalError::LlmApi("judge unavailable".to_string()))
        }
    }

    fn cases() -> Vec<TestCase> {
        vec![
            TestCase::new("What is 2+2?", "4", "4"),
            TestCase::new("Capital of France?", "Paris", "Lyon"),
        ]
    }

    #[tokio::test]
    async fn test_one_judge_call_per_case_and_metric() {
        let judge = EchoJudge {
            calls: AtomicUsize::new(0),
        };
        let metrics = vec![
            GEval::correctness("m"),
            GEval::correctness("m").with_threshold(0.9),
        ];

        let report = evaluate(&cases(), &metrics, &judge).await.unwrap();

        assert_eq!(judge.calls.load(Ordering::SeqCst), 4);
        assert_eq!(report.test_results.len(), 2);
        assert_eq!(report.test_results[0].metrics.len(), 2);
    }

    #[tokio::test]
    async fn test_pass_and_fail_are_reported() {
        let judge = EchoJudge {
            calls: AtomicUsize::new(0),
        };
        let report = evaluate(&cases(), &[GEval::correctness("m")], &judge)
            .await
            .unwrap();

        assert!(report.test_results[0].success);
        assert!(!report.test_results[1].success);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
    }

    #[tokio::test]
    async fn test_invalid_metric_is_rejected_before_judging() {
        let judge = EchoJudge {
            calls: AtomicUsize::new(0),
        };
        let result = evaluate(&cases(), &[GEval::new("NoSteps", "m")], &judge).await;

        assert!(matches!(result, Err(EvalError::InvalidMetric { .. })));
        assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_judge_failure_aborts() {
        let result = evaluate(&cases(), &[GEval::correctness("m")], &FailingJudge).await;
        assert!(matches!(result, Err(EvalError::LlmApi(_))));
    }
}
