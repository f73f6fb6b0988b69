//! Evaluation results: per-case outcomes, aggregate summary, console
//! rendering and JSON persistence.

use crate::error::{EvalError, Result};
use crate::metric::MetricResult;
use crate::test_case::TestCase;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All metric outcomes for one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Positional name, e.g. `test_case_0`.
    pub name: String,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub metrics: Vec<MetricResult>,
    /// True when every metric passed.
    pub success: bool,
}

impl TestResult {
    pub fn new(index: usize, case: &TestCase, metrics: Vec<MetricResult>) -> Self {
        let success = metrics.iter().all(|m| m.success);
        Self {
            name: format!("test_case_{}", index),
            input: case.input.clone(),
            expected_output: case.expected_output.clone(),
            actual_output: case.actual_output.clone(),
            metrics,
            success,
        }
    }
}

/// Aggregate for one metric across all cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: String,
    pub passed: usize,
    pub total: usize,
    pub pass_rate: f64,
    pub mean_score: f64,
}

/// Aggregate across all cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub metrics: Vec<MetricSummary>,
}

impl Summary {
    /// Calculate summary statistics from test results.
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.success).count();

        // Preserve first-seen metric order.
        let mut metrics: Vec<MetricSummary> = Vec::new();
        let mut score_sums: Vec<f64> = Vec::new();

        for metric in results.iter().flat_map(|r| &r.metrics) {
            let idx = match metrics.iter().position(|m| m.name == metric.name) {
                Some(idx) => idx,
                None => {
                    metrics.push(MetricSummary {
                        name: metric.name.clone(),
                        passed: 0,
                        total: 0,
                        pass_rate: 0.0,
                        mean_score: 0.0,
                    });
                    score_sums.push(0.0);
                    metrics.len() - 1
                }
            };

            metrics[idx].total += 1;
            if metric.success {
                metrics[idx].passed += 1;
            }
            score_sums[idx] += metric.score;
        }

        for (summary, sum) in metrics.iter_mut().zip(score_sums) {
            summary.pass_rate = ratio(summary.passed, summary.total);
            summary.mean_score = sum / summary.total as f64;
        }

        Self {
            total,
            passed,
            failed: total - passed,
            pass_rate: ratio(passed, total),
            metrics,
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Full outcome of an evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub test_results: Vec<TestResult>,
    pub summary: Summary,
    /// Wall time spent judging (seconds).
    pub total_time_secs: f64,
}

impl EvaluationReport {
    pub fn new(test_results: Vec<TestResult>, total_time_secs: f64) -> Self {
        let summary = Summary::from_results(&test_results);
        Self {
            test_results,
            summary,
            total_time_secs,
        }
    }

    /// True when every test case passed.
    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    /// Render the per-case blocks and the summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "─".repeat(60);

        out.push_str(&format!("{}\n", rule));
        for result in &self.test_results {
            let status = if result.success { "PASSED" } else { "FAILED" };
            out.push_str(&format!("{} [{}]\n", result.name, status));
            out.push_str(&format!("  Input:           {}\n", result.input));
            out.push_str(&format!("  Expected output: {}\n", result.expected_output));
            out.push_str(&format!("  Actual output:   {}\n", result.actual_output));
            for metric in &result.metrics {
                let mark = if metric.success { "✓" } else { "✗" };
                out.push_str(&format!(
                    "  {} {} (score: {:.2}, threshold: {:.2}, strict: {}, model: {})\n",
                    mark,
                    metric.name,
                    metric.score,
                    metric.threshold,
                    metric.strict,
                    metric.evaluation_model
                ));
                if !metric.reason.is_empty() {
                    out.push_str(&format!("    Reason: {}\n", metric.reason));
                }
            }
            out.push_str(&format!("{}\n", rule));
        }

        let summary = &self.summary;
        out.push_str("\n========== Evaluation Results ==========\n");
        out.push_str(&format!("Test cases: {}\n", summary.total));
        out.push_str(&format!(
            "Passed:     {} ({:.1}%)\n",
            summary.passed,
            summary.pass_rate * 100.0
        ));
        out.push_str(&format!("Failed:     {}\n", summary.failed));
        out.push_str("----------------------------------------\n");
        for metric in &summary.metrics {
            out.push_str(&format!(
                "{}: {}/{} passed ({:.1}%), mean score {:.2}\n",
                metric.name,
                metric.passed,
                metric.total,
                metric.pass_rate * 100.0,
                metric.mean_score
            ));
        }
        out.push_str("----------------------------------------\n");
        out.push_str(&format!("Evaluation time: {:.1}s\n", self.total_time_secs));
        out.push_str("========================================\n");
        out
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }

    /// Save the report as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| EvalError::io(parent, e))?;
            }
        }

        let data = serde_json::to_string_pretty(self)
            .map_err(|e| EvalError::Serialization(e.to_string()))?;

        fs::write(path, data).map_err(|e| EvalError::io(path, e))?;
        Ok(())
    }

    /// Load a previously saved report.
    pub fn load_json(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        serde_json::from_str(&data).map_err(|e| EvalError::Serialization(e.to_string()))
    }
}
