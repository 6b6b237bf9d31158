//! Where analysis runs: the local heuristic analyzer or the remote service.

use std::time::Duration;

use tracing::info;

use super::engine::PromptAnalyzer;
use super::remote::RemoteAnalyzer;
use super::types::FeedbackRecord;
use crate::error::Result;

pub enum AnalysisBackend {
    /// Heuristic analysis after a simulated service delay
    Local {
        analyzer: PromptAnalyzer,
        latency: Duration,
    },
    Remote(RemoteAnalyzer),
}

impl AnalysisBackend {
    /// Local analysis with no artificial delay.
    pub fn local(analyzer: PromptAnalyzer) -> Self {
        AnalysisBackend::Local {
            analyzer,
            latency: Duration::ZERO,
        }
    }

    pub fn local_with_latency(analyzer: PromptAnalyzer, latency: Duration) -> Self {
        AnalysisBackend::Local { analyzer, latency }
    }

    /// Analyze a prompt. Local analysis only fails if the future is dropped;
    /// remote analysis surfaces transport and validation errors.
    pub async fn analyze(&self, prompt: &str) -> Result<FeedbackRecord> {
        match self {
            AnalysisBackend::Local { analyzer, latency } => {
                if !latency.is_zero() {
                    tokio::time::sleep(*latency).await;
                }
                let feedback = analyzer.analyze(prompt);
                info!(
                    "Analysis complete: score={}, tier={:?}",
                    feedback.score,
                    feedback.tier()
                );
                Ok(feedback)
            }
            AnalysisBackend::Remote(remote) => remote.analyze(prompt).await,
        }
    }
}
