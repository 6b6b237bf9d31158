//! Client for the remote analysis service (`POST /api/chat`).
//!
//! The service answers with an envelope such as
//! `{ "isSuccess": true, "chat_response": "{\"score\": 7, ...}" }`.
//! The feedback may sit under `feedback` or `chat_response`, either as an
//! object or as a JSON-encoded string. Anything that does not carry a
//! truthy numeric score and three string arrays is rejected, never patched.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{error, info};
use url::Url;

use super::narrative::summary_for;
use super::rules::AnalysisRules;
use super::types::FeedbackRecord;
use crate::error::{PromptyError, Result};

pub struct RemoteAnalyzer {
    client: reqwest::Client,
    endpoint: Url,
    rules: AnalysisRules,
}

impl RemoteAnalyzer {
    /// Build a client for the service rooted at `base_url`.
    ///
    /// `rules` supplies the summary sentences, since the service does not
    /// return one.
    pub fn new(base_url: &str, timeout: Duration, rules: AnalysisRules) -> Result<Self> {
        let endpoint = chat_endpoint(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PromptyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            rules,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send the prompt to the service and validate what comes back.
    pub async fn analyze(&self, prompt: &str) -> Result<FeedbackRecord> {
        info!("Submitting prompt to {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| {
                let msg = if e.is_timeout() {
                    format!("timeout calling {}", self.endpoint)
                } else {
                    format!("{} ({})", e, self.endpoint)
                };
                error!("Analysis request failed: {}", msg);
                PromptyError::Transport(msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!("Analysis service returned {}", status);
            return Err(PromptyError::HttpStatus {
                status: status.as_u16(),
                body: truncate(&body, 1024),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PromptyError::Transport(format!("Failed to read response body: {}", e)))?;

        let mut feedback = parse_chat_response(&body).inspect_err(|e| {
            error!("Rejected analysis response: {}", e);
        })?;
        feedback.summary = summary_for(feedback.score, &self.rules).to_string();

        info!("Remote analysis complete: score={}", feedback.score);
        Ok(feedback)
    }
}

fn chat_endpoint(base_url: &str) -> Result<Url> {
    let joined = format!("{}/api/chat", base_url.trim_end_matches('/'));
    Url::parse(&joined)
        .map_err(|e| PromptyError::Config(format!("Invalid API URL '{}': {}", base_url, e)))
}

/// Parse a response envelope into feedback (summary left empty).
pub fn parse_chat_response(body: &str) -> Result<FeedbackRecord> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| {
        PromptyError::InvalidResponse(format!(
            "body is not JSON: {}. Body: {}",
            e,
            truncate(body, 500)
        ))
    })?;

    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .or_else(|| envelope.get("isSuccess").and_then(Value::as_bool));
    if success == Some(false) {
        let reason = envelope
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("no error message");
        return Err(PromptyError::RemoteFailure(reason.to_string()));
    }

    let payload = envelope
        .get("feedback")
        .or_else(|| envelope.get("chat_response"))
        .ok_or_else(|| PromptyError::InvalidResponse("missing feedback object".to_string()))?;

    match payload {
        Value::String(encoded) => {
            let decoded: Value = serde_json::from_str(encoded).map_err(|e| {
                PromptyError::InvalidResponse(format!("feedback string is not JSON: {}", e))
            })?;
            validate_feedback(&decoded)
        }
        other => validate_feedback(other),
    }
}

/// Check the feedback shape: truthy numeric score, three string arrays.
pub fn validate_feedback(value: &Value) -> Result<FeedbackRecord> {
    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| *s != 0.0 && s.is_finite())
        .ok_or_else(|| {
            PromptyError::InvalidResponse("missing required fields or incorrect types: score".to_string())
        })?;

    Ok(FeedbackRecord {
        score,
        strengths: string_array(value, "strengths")?,
        improvements: string_array(value, "improvements")?,
        tags: string_array(value, "tags")?,
        summary: String::new(),
    })
}

fn string_array(value: &Value, field: &str) -> Result<Vec<String>> {
    let items = value.get(field).and_then(Value::as_array).ok_or_else(|| {
        PromptyError::InvalidResponse(format!(
            "missing required fields or incorrect types: {}",
            field
        ))
    })?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                PromptyError::InvalidResponse(format!("{} must contain only strings", field))
            })
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
