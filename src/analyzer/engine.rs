//! The heuristic prompt analyzer.
//!
//! `PromptAnalyzer` runs the three stages in order: feature extraction,
//! scoring, narration. Every stage is total, so analysis never fails.

use tracing::debug;

use super::features::extract;
use super::narrative::{narrate, FillerStrategy};
use super::rules::AnalysisRules;
use super::scorer::score;
use super::types::{FeedbackRecord, SignalSet};

pub struct PromptAnalyzer {
    rules: AnalysisRules,
    filler: FillerStrategy,
}

impl PromptAnalyzer {
    /// Create an analyzer with the given rules (typically from `default_rules()`).
    pub fn new(rules: AnalysisRules) -> Self {
        Self {
            rules,
            filler: FillerStrategy::default(),
        }
    }

    pub fn with_filler(mut self, filler: FillerStrategy) -> Self {
        self.filler = filler;
        self
    }

    pub fn rules(&self) -> &AnalysisRules {
        &self.rules
    }

    pub fn signals(&self, prompt: &str) -> SignalSet {
        extract(prompt, &self.rules.signals)
    }

    /// Turn prompt text into a feedback record.
    pub fn analyze(&self, prompt: &str) -> FeedbackRecord {
        let signals = self.signals(prompt);
        let score = score(&signals, &self.rules.scoring);
        let narrative = narrate(&signals, score, prompt, &self.rules, self.filler);

        debug!(
            "Analyzed prompt: words={}, score={}, strengths={}, improvements={}, tags={:?}",
            signals.word_count,
            score,
            narrative.strengths.len(),
            narrative.improvements.len(),
            narrative.tags
        );

        FeedbackRecord {
            score,
            strengths: narrative.strengths,
            improvements: narrative.improvements,
            tags: narrative.tags,
            summary: narrative.summary,
        }
    }
}

impl Default for PromptAnalyzer {
    fn default() -> Self {
        Self::new(super::rules::default_rules())
    }
}
