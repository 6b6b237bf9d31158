pub mod analyzer;
mod error;
pub mod history;
pub mod settings;
pub mod workspace;

pub use analyzer::{AnalysisBackend, FeedbackRecord, PromptAnalyzer, ScoreTier, SignalSet};
pub use error::{PromptyError, Result};
pub use history::{HistoryEntry, KeyValueStore, PromptHistory};
pub use settings::Settings;
pub use workspace::{Completion, PromptWorkspace, RequestToken};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
