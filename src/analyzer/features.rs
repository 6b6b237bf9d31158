//! Feature extraction: prompt text -> `SignalSet`.

use super::rules::SignalRules;
use super::types::SignalSet;

/// Derive signals from prompt text. Total over all strings, including "".
pub fn extract(text: &str, rules: &SignalRules) -> SignalSet {
    let lowered = text.to_lowercase();

    SignalSet {
        word_count: text.split_whitespace().count(),
        has_specific_request: contains_any(&lowered, &rules.action_verbs),
        has_context: text.chars().count() > rules.context_min_chars,
        has_formatting: contains_any(&lowered, &rules.formatting_markers),
        has_constraints: contains_any(&lowered, &rules.constraint_markers),
        has_examples: contains_any(&lowered, &rules.example_markers),
    }
}

/// Case-insensitive substring test. `lowered` must already be lowercase.
pub(crate) fn contains_any(lowered: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| !needle.is_empty() && lowered.contains(&needle.to_lowercase()))
}
