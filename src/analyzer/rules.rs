//! TOML rule loading for the prompt analyzer.
//!
//! Provides two loading methods:
//! - `default_rules()` - Loads embedded rules compiled into the binary
//! - `load_rules(path)` - Loads custom rules from a file path

use anyhow::{bail, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Default rules embedded in the binary at compile time.
/// These are loaded from `config/analysis_rules.toml`.
const DEFAULT_RULES: &str = include_str!("../../config/analysis_rules.toml");

/// Root configuration loaded from analysis_rules.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRules {
    pub signals: SignalRules,
    pub scoring: ScoringRules,
    pub narrative: NarrativeRules,
    pub tags: TagRules,
    pub summaries: SummaryRules,
}

/// Vocabulary used by the feature extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalRules {
    pub action_verbs: Vec<String>,
    /// Prompts longer than this many characters count as having context
    pub context_min_chars: usize,
    pub formatting_markers: Vec<String>,
    pub constraint_markers: Vec<String>,
    pub example_markers: Vec<String>,
}

/// Additive weights applied by the scorer.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRules {
    pub base: f64,
    pub min: f64,
    pub max: f64,
    /// Word count that must be exceeded for `detail_bonus`
    pub detail_words: usize,
    pub detail_bonus: f64,
    /// Word count that must be exceeded for `extended_bonus` (stacks with detail)
    pub extended_words: usize,
    pub extended_bonus: f64,
    pub specific_request_bonus: f64,
    pub context_bonus: f64,
    pub formatting_bonus: f64,
    pub constraints_bonus: f64,
    pub examples_bonus: f64,
}

/// Canned text for strengths and improvements.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeRules {
    pub min_strengths: usize,
    pub min_improvements: usize,
    /// Prompts with fewer words than this get the "add more detail" improvement
    pub brief_prompt_words: usize,
    pub strengths: SignalSentences,
    pub improvements: SignalSentences,
    pub strength_fillers: Vec<String>,
    pub improvement_fillers: Vec<String>,
}

/// One sentence per signal.
#[derive(Debug, Clone, Deserialize)]
pub struct SignalSentences {
    pub length: String,
    pub specific_request: String,
    pub context: String,
    pub formatting: String,
    pub constraints: String,
    pub examples: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagRules {
    pub min_tags: usize,
    /// Padding vocabulary, drawn from when too few families match
    pub candidates: Vec<String>,
    /// Scanned in order; each matching family contributes its tag
    pub families: Vec<TagFamily>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagFamily {
    pub tag: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRules {
    pub excellent: String,
    pub good: String,
    pub adequate: String,
    pub needs_improvement: String,
}

impl AnalysisRules {
    /// Check that filler pools can always satisfy the minimum counts.
    pub fn validate(&self) -> Result<()> {
        let n = &self.narrative;
        let strengths = distinct(&n.strength_fillers);
        if strengths < n.min_strengths {
            bail!(
                "strength_fillers has {} distinct entries, need at least {}",
                strengths,
                n.min_strengths
            );
        }
        let improvements = distinct(&n.improvement_fillers);
        if improvements < n.min_improvements {
            bail!(
                "improvement_fillers has {} distinct entries, need at least {}",
                improvements,
                n.min_improvements
            );
        }
        if distinct(&self.tags.candidates) < self.tags.min_tags {
            bail!(
                "tag candidates must hold at least {} distinct tags",
                self.tags.min_tags
            );
        }
        if self.scoring.min > self.scoring.max {
            bail!(
                "scoring.min ({}) exceeds scoring.max ({})",
                self.scoring.min,
                self.scoring.max
            );
        }
        Ok(())
    }
}

fn distinct(items: &[String]) -> usize {
    items.iter().collect::<HashSet<_>>().len()
}

/// Load rules from a TOML file at the given path.
///
/// # Returns
/// * `Ok(AnalysisRules)` - Parsed and validated rules
/// * `Err` - If the file cannot be read, the TOML is invalid, or a filler
///   pool is too small to meet its minimum
pub fn load_rules(path: &Path) -> Result<AnalysisRules> {
    let content = std::fs::read_to_string(path)?;
    let rules: AnalysisRules = toml::from_str(&content)?;
    rules.validate()?;
    Ok(rules)
}

/// Get the default rules embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_rules() -> AnalysisRules {
    toml::from_str(DEFAULT_RULES).expect("embedded analysis_rules.toml must be valid TOML")
}
