//! Narrative generation: strengths, improvements, tags and summary.
//!
//! Each true signal maps to one strength sentence and each false signal to one
//! improvement sentence. Lists that come up short are padded from fixed filler
//! pools; the order filler is drawn in is decided by a `FillerStrategy`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::contains_any;
use super::rules::AnalysisRules;
use super::types::{ScoreTier, SignalSet};

/// How padding items are chosen from a filler pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillerStrategy {
    /// Pool order, first unused item first
    #[default]
    Ordered,
    /// Pseudo-random draw seeded from the prompt text
    Seeded,
}

/// Human-readable part of a feedback record.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tags: Vec<String>,
    pub summary: String,
}

enum FillerPicker {
    Ordered,
    Seeded(StdRng),
}

impl FillerPicker {
    fn new(strategy: FillerStrategy, prompt: &str) -> Self {
        match strategy {
            FillerStrategy::Ordered => FillerPicker::Ordered,
            FillerStrategy::Seeded => {
                FillerPicker::Seeded(StdRng::seed_from_u64(prompt_seed(prompt)))
            }
        }
    }

    /// Remove and return one item from the remaining pool.
    fn take<'a>(&mut self, remaining: &mut Vec<&'a String>) -> Option<&'a String> {
        if remaining.is_empty() {
            return None;
        }
        let index = match self {
            FillerPicker::Ordered => 0,
            FillerPicker::Seeded(rng) => rng.random_range(0..remaining.len()),
        };
        Some(remaining.remove(index))
    }

    /// Pad `items` to `min` entries from `pool`, never adding a duplicate.
    fn pad(&mut self, items: &mut Vec<String>, pool: &[String], min: usize) {
        let mut remaining: Vec<&String> = pool.iter().filter(|p| !items.contains(*p)).collect();
        while items.len() < min {
            match self.take(&mut remaining) {
                Some(item) if !items.contains(item) => items.push(item.clone()),
                Some(_) => continue,
                None => break,
            }
        }
    }
}

/// 64-bit FNV-1a over the prompt bytes, stable across builds and platforms.
fn prompt_seed(prompt: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    prompt
        .bytes()
        .fold(OFFSET_BASIS, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Build the narrative for a scored prompt.
pub fn narrate(
    signals: &SignalSet,
    score: f64,
    prompt: &str,
    rules: &AnalysisRules,
    strategy: FillerStrategy,
) -> Narrative {
    let mut picker = FillerPicker::new(strategy, prompt);
    let n = &rules.narrative;

    let mut strengths = Vec::new();
    if signals.word_count > rules.scoring.detail_words {
        strengths.push(n.strengths.length.clone());
    }
    let flags = [
        (signals.has_specific_request, &n.strengths.specific_request, &n.improvements.specific_request),
        (signals.has_context, &n.strengths.context, &n.improvements.context),
        (signals.has_formatting, &n.strengths.formatting, &n.improvements.formatting),
        (signals.has_constraints, &n.strengths.constraints, &n.improvements.constraints),
        (signals.has_examples, &n.strengths.examples, &n.improvements.examples),
    ];
    for (on, strength, _) in &flags {
        if *on {
            strengths.push((*strength).clone());
        }
    }
    picker.pad(&mut strengths, &n.strength_fillers, n.min_strengths);

    // A prompt of exactly `brief_prompt_words` words earns neither length sentence.
    let mut improvements = Vec::new();
    if signals.word_count < n.brief_prompt_words {
        improvements.push(n.improvements.length.clone());
    }
    for (on, _, improvement) in &flags {
        if !*on {
            improvements.push((*improvement).clone());
        }
    }
    picker.pad(&mut improvements, &n.improvement_fillers, n.min_improvements);

    let tags = build_tags(prompt, rules, &mut picker);

    Narrative {
        strengths,
        improvements,
        tags,
        summary: summary_for(score, rules).to_string(),
    }
}

fn build_tags(prompt: &str, rules: &AnalysisRules, picker: &mut FillerPicker) -> Vec<String> {
    let lowered = prompt.to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for family in &rules.tags.families {
        if contains_any(&lowered, &family.keywords) && !tags.contains(&family.tag) {
            tags.push(family.tag.clone());
        }
    }

    picker.pad(&mut tags, &rules.tags.candidates, rules.tags.min_tags);
    tags
}

/// Summary sentence for the score's tier.
pub fn summary_for(score: f64, rules: &AnalysisRules) -> &str {
    let s = &rules.summaries;
    match ScoreTier::from_score(score) {
        ScoreTier::Excellent => &s.excellent,
        ScoreTier::Good => &s.good,
        ScoreTier::Adequate => &s.adequate,
        ScoreTier::NeedsImprovement => &s.needs_improvement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::default_rules;

    fn all_on() -> SignalSet {
        SignalSet {
            word_count: 40,
            has_specific_request: true,
            has_context: true,
            has_formatting: true,
            has_constraints: true,
            has_examples: true,
        }
    }

    #[test]
    fn test_empty_signals_pad_strengths_in_pool_order() {
        let rules = default_rules();
        let n = narrate(&SignalSet::default(), 5.0, "", &rules, FillerStrategy::Ordered);

        assert_eq!(n.strengths, vec!["Clear objective", "Reasonable request"]);
        // Length + five flag improvements, no padding needed
        assert_eq!(n.improvements.len(), 6);
        assert_eq!(n.improvements[0], "Add more detail to provide context");
        assert_eq!(n.tags, vec!["creative", "technical", "business"]);
    }

    #[test]
    fn test_all_signals_pad_improvements() {
        let rules = default_rules();
        let n = narrate(&all_on(), 10.0, "", &rules, FillerStrategy::Ordered);

        assert_eq!(n.strengths.len(), 6);
        assert!(n.strengths.contains(&"Includes examples for clarity".to_string()));
        assert_eq!(
            n.improvements,
            vec![
                "Try adding more specific requirements",
                "Consider breaking complex requests into steps",
            ]
        );
        assert_eq!(n.summary, rules.summaries.excellent);
    }

    #[test]
    fn test_one_strength_gets_one_filler() {
        let rules = default_rules();
        let signals = SignalSet {
            has_examples: true,
            ..Default::default()
        };
        let n = narrate(&signals, 6.0, "", &rules, FillerStrategy::Ordered);
        assert_eq!(
            n.strengths,
            vec!["Includes examples for clarity", "Clear objective"]
        );
    }

    #[test]
    fn test_exactly_fifteen_words_has_no_length_sentence() {
        let rules = default_rules();
        let signals = SignalSet {
            word_count: 15,
            ..Default::default()
        };
        let n = narrate(&signals, 5.0, "", &rules, FillerStrategy::Ordered);
        assert!(!n.strengths.contains(&rules.narrative.strengths.length));
        assert!(!n.improvements.contains(&rules.narrative.improvements.length));
    }

    #[test]
    fn test_content_tags_come_first_in_family_order() {
        let rules = default_rules();
        let prompt = "Write a blog post about our company website and its API";
        let n = narrate(&SignalSet::default(), 5.0, prompt, &rules, FillerStrategy::Ordered);
        assert_eq!(n.tags, vec!["coding", "design", "business", "writing"]);
    }

    #[test]
    fn test_tag_padding_skips_present_tags() {
        let rules = default_rules();
        // "plan" hits business; padding must skip it
        let n = narrate(&SignalSet::default(), 5.0, "plan", &rules, FillerStrategy::Ordered);
        assert_eq!(n.tags, vec!["business", "creative", "technical"]);
    }

    #[test]
    fn test_seeded_is_reproducible_and_distinct() {
        let rules = default_rules();
        for prompt in ["", "hi", "tell me a joke", "plan"] {
            let a = narrate(&SignalSet::default(), 3.0, prompt, &rules, FillerStrategy::Seeded);
            let b = narrate(&SignalSet::default(), 3.0, prompt, &rules, FillerStrategy::Seeded);
            assert_eq!(a, b);

            assert_eq!(a.strengths.len(), 2);
            assert_ne!(a.strengths[0], a.strengths[1]);
            for s in &a.strengths {
                assert!(rules.narrative.strength_fillers.contains(s));
            }

            assert!(a.tags.len() >= 3);
            let mut unique = a.tags.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), a.tags.len());
        }
    }

    #[test]
    fn test_prompt_seed_is_fixed_fnv1a() {
        assert_eq!(prompt_seed(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(prompt_seed("a"), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(prompt_seed("write a poem"), prompt_seed("write a poen"));
    }

    #[test]
    fn test_summary_tiers() {
        let rules = default_rules();
        assert_eq!(summary_for(8.0, &rules), rules.summaries.excellent);
        assert_eq!(summary_for(6.0, &rules), rules.summaries.good);
        assert_eq!(summary_for(5.0, &rules), rules.summaries.adequate);
        assert_eq!(summary_for(3.5, &rules), rules.summaries.needs_improvement);
    }
}
