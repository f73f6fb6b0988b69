//! Labeled dataset loading.
//!
//! The dataset is JSON Lines: one `{"input": ..., "ideal": ...}` object per
//! line. Blank lines are skipped; every other line must parse or the whole
//! load fails.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A single labeled example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Prompt sent to the generator.
    pub input: String,
    /// Expected answer.
    pub ideal: String,
}

impl Record {
    pub fn new(input: impl Into<String>, ideal: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ideal: ideal.into(),
        }
    }
}

/// Load records from a JSONL file, preserving file order.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
    let records = parse_records(&content)?;
    debug!(path = %path.display(), count = records.len(), "loaded dataset");
    Ok(records)
}

/// Parse records from JSONL text.
///
/// Errors carry the 1-based line number of the offending line.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| EvalError::DatasetParse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}
