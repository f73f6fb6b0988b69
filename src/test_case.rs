//! Test cases: a labeled record paired with the generated answer.

use crate::dataset::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record augmented with the model's actual output, ready for judging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
}

impl TestCase {
    pub fn new(
        input: impl Into<String>,
        expected_output: impl Into<String>,
        actual_output: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            actual_output: actual_output.into(),
        }
    }

    /// Build a test case from a record and the answer generated for its input.
    pub fn from_record(record: &Record, actual_output: impl Into<String>) -> Self {
        Self::new(record.input.clone(), record.ideal.clone(), actual_output)
    }

    /// Value of the given field.
    pub fn get(&self, param: TestCaseParam) -> &str {
        match param {
            TestCaseParam::Input => &self.input,
            TestCaseParam::ActualOutput => &self.actual_output,
            TestCaseParam::ExpectedOutput => &self.expected_output,
        }
    }
}

/// Fields of a [`TestCase`] a metric may inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseParam {
    Input,
    ActualOutput,
    ExpectedOutput,
}

impl TestCaseParam {
    /// Human-readable label used in judge prompts.
    pub fn label(&self) -> &'static str {
        match self {
            TestCaseParam::Input => "Input",
            TestCaseParam::ActualOutput => "Actual Output",
            TestCaseParam::ExpectedOutput => "Expected Output",
        }
    }
}

impl fmt::Display for TestCaseParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
