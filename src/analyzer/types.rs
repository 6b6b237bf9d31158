//! Type definitions for prompt analysis.
//!
//! `SignalSet` is the ephemeral intermediate produced from prompt text;
//! `FeedbackRecord` is what callers display and what history persists.

use serde::{Deserialize, Serialize};

/// Features derived from prompt text. Same text always yields the same set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSet {
    /// Number of whitespace-delimited tokens
    pub word_count: usize,
    /// Contains an action verb such as "create" or "build"
    pub has_specific_request: bool,
    /// Longer than the context threshold
    pub has_context: bool,
    /// Mentions format, style or organization
    pub has_formatting: bool,
    /// Contains a negation/exclusion marker
    pub has_constraints: bool,
    /// Contains an example marker
    pub has_examples: bool,
}

/// Structured feedback for a single prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// 1.0 to 10.0, one decimal place
    pub score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tags: Vec<String>,
    /// One-line summary chosen by score tier. Remote feedback may omit it.
    #[serde(default)]
    pub summary: String,
}

impl FeedbackRecord {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score)
    }
}

/// Score band used for the summary sentence and display headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    Adequate,
    NeedsImprovement,
}

impl ScoreTier {
    /// Lower bounds are inclusive: 8.0 is excellent, 7.9 is good.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreTier::Excellent
        } else if score >= 6.0 {
            ScoreTier::Good
        } else if score >= 4.0 {
            ScoreTier::Adequate
        } else {
            ScoreTier::NeedsImprovement
        }
    }

    /// Short exclamation shown next to a score.
    pub fn headline(score: f64) -> &'static str {
        if score >= 10.0 {
            return "Perfect!";
        }
        match Self::from_score(score) {
            ScoreTier::Excellent => "Wow!",
            ScoreTier::Good => "Nice!",
            ScoreTier::Adequate => "Getting there...",
            ScoreTier::NeedsImprovement => "Meh...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_inclusive() {
        assert_eq!(ScoreTier::from_score(10.0), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_score(8.0), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_score(7.9), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(6.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(5.0), ScoreTier::Adequate);
        assert_eq!(ScoreTier::from_score(4.0), ScoreTier::Adequate);
        assert_eq!(ScoreTier::from_score(3.9), ScoreTier::NeedsImprovement);
        assert_eq!(ScoreTier::from_score(1.0), ScoreTier::NeedsImprovement);
    }

    #[test]
    fn test_headlines() {
        assert_eq!(ScoreTier::headline(10.0), "Perfect!");
        assert_eq!(ScoreTier::headline(9.5), "Wow!");
        assert_eq!(ScoreTier::headline(6.5), "Nice!");
        assert_eq!(ScoreTier::headline(5.0), "Getting there...");
        assert_eq!(ScoreTier::headline(2.0), "Meh...");
    }

    #[test]
    fn test_signal_set_default_is_empty() {
        let signals = SignalSet::default();
        assert_eq!(signals.word_count, 0);
        assert!(!signals.has_specific_request);
        assert!(!signals.has_examples);
    }

    #[test]
    fn test_feedback_deserialize_without_summary() {
        let json = r#"{
            "score": 7.5,
            "strengths": ["a", "b"],
            "improvements": ["c", "d"],
            "tags": ["coding", "design", "writing"]
        }"#;
        let feedback: FeedbackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.score, 7.5);
        assert!(feedback.summary.is_empty());
        assert_eq!(feedback.tier(), ScoreTier::Good);
    }

    #[test]
    fn test_signal_set_serializes_camel_case() {
        let json = serde_json::to_string(&SignalSet::default()).unwrap();
        assert!(json.contains("wordCount"));
        assert!(json.contains("hasSpecificRequest"));
    }
}
