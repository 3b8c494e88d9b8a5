//! Judge prompts

/// System message sent ahead of every comparison.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides similarity scores.";

/// Build the user message comparing `expected` with `actual`.
pub fn comparison_prompt(expected: &str, actual: &str) -> String {
    format!(
        r#"You are an AI performance evaluator. Your task is to compare two text snippets and rate their semantic similarity on an integer scale from 1 to 10.

Scoring rubric:
- 1: the snippets are unrelated.
- 2-6: the actual response shares some, but not all, of the critical information in the expected response.
- 7-9: the actual response contains all critical information of the expected response, plus extra relevant detail.
- 10: the snippets are semantically identical, regardless of phrasing.

Respond with exactly one integer score in the "score" field and nothing else.

Expected Response:
---
{expected}
---

Actual Response:
---
{actual}
---

Similarity Score (1-10):"#
    )
}
