//! LLM prompts used by the judge.

/// Collection of prompt templates.
///
/// Placeholders are written as `{name}` and filled with [`Prompts::fill`].
pub struct Prompts;

impl Prompts {
    /// Substitute `{key}` placeholders in a single pass over `template`.
    ///
    /// Inserted values are never rescanned, and braces that do not name a
    /// known key are kept verbatim.
    pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 1..];

            let hit = values.iter().find(|(key, _)| {
                tail.strip_prefix(*key)
                    .is_some_and(|after| after.starts_with('}'))
            });

            match hit {
                Some((key, value)) => {
                    out.push_str(value);
                    rest = &tail[key.len() + 1..];
                }
                None => {
                    out.push('{');
                    rest = tail;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Prompt asking the judge to grade a test case against evaluation steps.
    ///
    /// Placeholders: `{steps}`, `{test_case}`, `{parameters}`, `{scale}`.
    pub fn geval_evaluation() -> &'static str {
        r#"You are an impartial evaluator. Grade the test case below by following the evaluation steps.

Evaluation Steps:
{steps}

Test Case:
{test_case}

Parameters to consider: {parameters}

Return a JSON object with two keys:
- "score": {scale}
- "reason": a short justification that refers to specific content of the {parameters}. Do not repeat the score in the reason.

Example:
{
    "score": 0,
    "reason": "The actual output names a different city than the expected output."
}

Directly return the JSON object. Do not output anything else."#
    }

    /// Score scale description for graded evaluation.
    pub fn graded_scale() -> &'static str {
        "an integer from 0 to 10, where 10 means the test case fully satisfies the evaluation steps and 0 means it does not satisfy them at all"
    }

    /// Score scale description for strict (binary) evaluation.
    pub fn strict_scale() -> &'static str {
        "either 0 or 10, where 10 means the test case fully satisfies the evaluation steps and 0 means it does not; no other value is allowed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_not_empty() {
        assert!(!Prompts::geval_evaluation().is_empty());
        assert!(!Prompts::graded_scale().is_empty());
        assert!(!Prompts::strict_scale().is_empty());
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let filled = Prompts::fill("{a} then {b}", &[("a", "literal {b}"), ("b", "B")]);
        assert_eq!(filled, "literal {b} then B");
    }

    #[test]
    fn test_fill_keeps_unknown_braces() {
        let filled = Prompts::fill("{\n  \"score\": 0\n} {x} {missing}", &[("x", "X")]);
        assert_eq!(filled, "{\n  \"score\": 0\n} X {missing}");
    }

    #[test]
    fn test_evaluation_prompt_has_placeholders() {
        let prompt = Prompts::geval_evaluation();
        for placeholder in ["{steps}", "{test_case}", "{parameters}", "{scale}"] {
            assert!(prompt.contains(placeholder), "missing {placeholder}");
        }
    }
}
