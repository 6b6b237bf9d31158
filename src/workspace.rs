//! The editing session that ties analysis to history.
//!
//! Holds the prompt being edited and the feedback on display. Each analysis
//! request gets a `RequestToken`; only the token from the most recent
//! request may update the displayed feedback or write history, so a slow
//! earlier request can never overwrite a newer result.

use tracing::{debug, info, warn};

use crate::analyzer::{AnalysisBackend, FeedbackRecord};
use crate::error::{PromptyError, Result};
use crate::history::{HistoryEntry, KeyValueStore, PromptHistory};

/// Identifies one analysis request and the prompt text it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    prompt: String,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// What happened to a finished request.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Feedback is now displayed and recorded as this history entry
    Applied(HistoryEntry),
    /// A newer request superseded this one; its result was dropped
    Stale,
}

pub struct PromptWorkspace<S: KeyValueStore> {
    backend: AnalysisBackend,
    history: PromptHistory<S>,
    prompt: String,
    feedback: Option<FeedbackRecord>,
    latest: u64,
    in_flight: Option<u64>,
}

impl<S: KeyValueStore> PromptWorkspace<S> {
    pub fn new(backend: AnalysisBackend, history: PromptHistory<S>) -> Self {
        Self {
            backend,
            history,
            prompt: String::new(),
            feedback: None,
            latest: 0,
            in_flight: None,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn feedback(&self) -> Option<&FeedbackRecord> {
        self.feedback.as_ref()
    }

    pub fn history(&self) -> &PromptHistory<S> {
        &self.history
    }

    pub fn backend(&self) -> &AnalysisBackend {
        &self.backend
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start an analysis of the current prompt.
    ///
    /// Rejects empty or whitespace-only prompts before any analysis runs.
    /// Clears the displayed feedback and supersedes any outstanding request.
    pub fn begin_analysis(&mut self) -> Result<RequestToken> {
        if self.prompt.trim().is_empty() {
            warn!("Rejected analysis of empty prompt");
            return Err(PromptyError::EmptyPrompt);
        }

        self.latest += 1;
        self.in_flight = Some(self.latest);
        self.feedback = None;
        debug!("Started analysis request {}", self.latest);

        Ok(RequestToken {
            generation: self.latest,
            prompt: self.prompt.clone(),
        })
    }

    /// Finish the request identified by `token` with its analysis result.
    ///
    /// Stale tokens are discarded whatever their result. For the current
    /// token an error is returned as-is; success updates the displayed
    /// feedback and records a history entry.
    pub fn complete_analysis(
        &mut self,
        token: RequestToken,
        result: Result<FeedbackRecord>,
    ) -> Result<Completion> {
        if token.generation != self.latest {
            info!(
                "Discarding stale analysis result {} (latest is {})",
                token.generation, self.latest
            );
            return Ok(Completion::Stale);
        }

        self.in_flight = None;
        let feedback = result?;
        self.feedback = Some(feedback.clone());

        let entry = self.history.record(&token.prompt, feedback)?;
        Ok(Completion::Applied(entry))
    }

    /// Validate, analyze and record the current prompt in one step.
    pub async fn submit(&mut self) -> Result<Completion> {
        let token = self.begin_analysis()?;
        let result = self.backend.analyze(token.prompt()).await;
        self.complete_analysis(token, result)
    }

    /// Clear the prompt and the displayed feedback.
    pub fn clear_prompt(&mut self) {
        self.prompt.clear();
        self.feedback = None;
    }

    /// Copy a history entry's prompt and feedback into the editing state.
    /// The stored entry is not touched.
    pub fn select_from_history(&mut self, id: &str) -> Result<()> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| PromptyError::UnknownHistoryEntry(id.to_string()))?;

        self.prompt = entry.prompt.clone();
        self.feedback = Some(entry.feedback.clone());
        Ok(())
    }

    pub fn remove_from_history(&mut self, id: &str) -> Result<bool> {
        self.history.remove(id)
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }
}
