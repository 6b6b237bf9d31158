//! Additive weighted scoring of a `SignalSet`.

use super::rules::ScoringRules;
use super::types::SignalSet;

/// Score signals: base plus bonuses, rounded to one decimal, then clamped.
pub fn score(signals: &SignalSet, rules: &ScoringRules) -> f64 {
    let mut raw = rules.base;

    if signals.word_count > rules.detail_words {
        raw += rules.detail_bonus;
    }
    if signals.word_count > rules.extended_words {
        raw += rules.extended_bonus;
    }
    if signals.has_specific_request {
        raw += rules.specific_request_bonus;
    }
    if signals.has_context {
        raw += rules.context_bonus;
    }
    if signals.has_formatting {
        raw += rules.formatting_bonus;
    }
    if signals.has_constraints {
        raw += rules.constraints_bonus;
    }
    if signals.has_examples {
        raw += rules.examples_bonus;
    }

    round_tenths(raw).clamp(rules.min, rules.max)
}

/// Round half-up on the tenths digit.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
