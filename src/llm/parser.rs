//! Response parsing for LLM outputs.
//!
//! Extracts candidate SQL statements from fenced code blocks in free-form
//! LLM output.

use regex::Regex;
use std::sync::LazyLock;

/// Triple-backtick fence with an optional `sql` tag right after the opening marker.
static CODE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:[ \t]?sql\b)?([\s\S]*?)```").unwrap());

/// Extracts candidate SQL statements from an LLM response.
///
/// Every fenced block (```` ```sql ```` or bare ```` ``` ````) yields one
/// trimmed candidate, in order of appearance. If no block is found the whole
/// trimmed response is returned as the only candidate, so the result is never
/// empty.
pub fn extract_sql_candidates(response: &str) -> Vec<String> {
    let blocks: Vec<String> = CODE_BLOCK_REGEX
        .captures_iter(response)
        .map(|caps| caps[1].trim().to_string())
        .collect();

    if blocks.is_empty() {
        vec![response.trim().to_string()]
    } else {
        blocks
    }
}
