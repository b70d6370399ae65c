//! Skill telemetry — one event per invocation.
//!
//! Error text is truncated before it reaches any sink so large response
//! bodies never end up in logs wholesale.

use std::sync::Mutex;

use serde::Serialize;

const MAX_ERROR_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEvent {
    pub user_id: Option<String>,
    /// `skill:<id>`.
    pub action: String,
    pub skill_id: String,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub payload_size: usize,
}

impl SkillEvent {
    #[must_use]
    pub fn new(skill_id: &str, user_id: Option<&str>, status: EventStatus, payload_size: usize) -> Self {
        Self {
            user_id: user_id.map(str::to_string),
            action: format!("skill:{skill_id}"),
            skill_id: skill_id.to_string(),
            status,
            duration_ms: None,
            error: None,
            payload_size,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(truncate(error, MAX_ERROR_CHARS));
        self
    }
}

/// Cut `s` to at most `max` characters, marking the cut with an ellipsis.
#[must_use]
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Receives one event per invocation. Must not fail the call.
pub trait SkillTelemetry: Send + Sync {
    fn record(&self, event: &SkillEvent);
}

/// Default sink: a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl SkillTelemetry for TracingTelemetry {
    fn record(&self, event: &SkillEvent) {
        match event.status {
            EventStatus::Success => tracing::info!(
                action = %event.action,
                user_id = event.user_id.as_deref().unwrap_or("-"),
                duration_ms = event.duration_ms,
                payload_size = event.payload_size,
                "skill call succeeded"
            ),
            EventStatus::Failure => tracing::warn!(
                action = %event.action,
                user_id = event.user_id.as_deref().unwrap_or("-"),
                duration_ms = event.duration_ms,
                payload_size = event.payload_size,
                error = event.error.as_deref().unwrap_or(""),
                "skill call failed"
            ),
        }
    }
}

/// Keeps every event in memory. Used by tests and the CLI's `--events` flag.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    events: Mutex<Vec<SkillEvent>>,
}

impl MemoryTelemetry {
    #[must_use]
    pub fn events(&self) -> Vec<SkillEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl SkillTelemetry for MemoryTelemetry {
    fn record(&self, event: &SkillEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
#[path = "telemetry_test.rs"]
mod tests;
