//! Heuristic prompt analysis.
//!
//! # Architecture
//!
//! - **Rules**: vocabulary, weights and canned text loaded from TOML (or embedded defaults)
//! - **Features**: prompt text -> `SignalSet`
//! - **Scoring**: `SignalSet` -> score in [1.0, 10.0], one decimal
//! - **Narrative**: signals + score -> strengths, improvements, tags, summary
//! - **Backends**: local analysis (optionally delayed) or the remote `/api/chat` service
//!
//! # Example
//!
//! ```
//! use prompy::analyzer::{default_rules, PromptAnalyzer};
//!
//! let analyzer = PromptAnalyzer::new(default_rules());
//! let feedback = analyzer.analyze("Create a landing page, for example a hero banner");
//!
//! assert!(feedback.score >= 1.0 && feedback.score <= 10.0);
//! assert!(feedback.strengths.len() >= 2);
//! assert!(feedback.tags.len() >= 3);
//! ```

mod backend;
mod engine;
mod features;
mod narrative;
pub mod remote;
mod rules;
mod scorer;
mod types;

pub use backend::AnalysisBackend;
pub use engine::PromptAnalyzer;
pub use features::extract;
pub use narrative::{narrate, summary_for, FillerStrategy, Narrative};
pub use remote::RemoteAnalyzer;
pub use rules::{
    default_rules, load_rules, AnalysisRules, NarrativeRules, ScoringRules, SignalRules,
    SignalSentences, SummaryRules, TagFamily, TagRules,
};
pub use scorer::score;
pub use types::*;
