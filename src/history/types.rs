use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::FeedbackRecord;

/// One analyzed prompt as kept in history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in epoch milliseconds, as a string
    pub id: String,
    pub prompt: String,
    pub feedback: FeedbackRecord,
    pub timestamp: DateTime<Utc>,
}

/// Preview length used by history listings.
pub const PREVIEW_CHARS: usize = 100;

impl HistoryEntry {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, feedback: FeedbackRecord) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            feedback,
            timestamp: Utc::now(),
        }
    }

    /// The prompt cut to `max_chars` characters, with "..." when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.prompt.chars().count() <= max_chars {
            return self.prompt.clone();
        }
        let cut: String = self.prompt.chars().take(max_chars).collect();
        format!("{}...", cut)
    }

    /// At most the first three tags.
    pub fn display_tags(&self) -> &[String] {
        let end = self.feedback.tags.len().min(3);
        &self.feedback.tags[..end]
    }
}
