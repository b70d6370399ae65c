//! Skill types — request, outcome and error-code shapes.
//!
//! The outcome serializes with a `status` tag so callers can branch on
//! `"ok"` / `"error"` exactly as the dashboard hooks do.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Normalized failure classes for a skill invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillErrorCode {
    /// Caller passed an id that is not in the registry.
    UnknownSkill,
    /// Base URL or access key absent from configuration.
    ConfigMissing,
    /// Transport failure, or an internal failure converted at the boundary.
    Network,
    /// The remote function answered with a non-2xx status.
    Http(u16),
}

impl SkillErrorCode {
    /// Wire form: `unknown_skill`, `config_missing`, `network`, `http_<status>`.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::UnknownSkill => "unknown_skill".into(),
            Self::ConfigMissing => "config_missing".into(),
            Self::Network => "network".into(),
            Self::Http(status) => format!("http_{status}"),
        }
    }

    /// Parse the wire form back into a code.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unknown_skill" => Some(Self::UnknownSkill),
            "config_missing" => Some(Self::ConfigMissing),
            "network" => Some(Self::Network),
            other => other
                .strip_prefix("http_")
                .and_then(|s| s.parse::<u16>().ok())
                .map(Self::Http),
        }
    }

    /// Whether a caller may reasonably retry the same request.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Http(429 | 500..=599))
    }
}

impl fmt::Display for SkillErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl Serialize for SkillErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for SkillErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("unknown skill error code: {raw}")))
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// Identity of the caller forwarded to the skill as `userContext`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    pub user_id: String,
}

/// One skill invocation. Built per call, never persisted.
#[derive(Debug, Clone)]
pub struct SkillRequest {
    pub skill_id: String,
    pub input: Value,
    pub caller_context: Option<CallerContext>,
    pub trace_id: Option<String>,
}

impl SkillRequest {
    pub fn new(skill_id: impl Into<String>, input: Value) -> Self {
        Self { skill_id: skill_id.into(), input, caller_context: None, trace_id: None }
    }

    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.caller_context = Some(CallerContext { user_id: user_id.into() });
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// JSON body POSTed to the edge function.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRequest<'a> {
    pub skill_id: &'a str,
    pub input: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_context: Option<&'a CallerContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<&'a str>,
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Normalized result of one invocation. Exactly one of output / error code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkillOutcome<T> {
    Ok {
        output: T,
        #[serde(rename = "elapsedMs")]
        elapsed_ms: u64,
    },
    Error {
        #[serde(rename = "errorCode")]
        error_code: SkillErrorCode,
        message: String,
        #[serde(rename = "elapsedMs", skip_serializing_if = "Option::is_none", default)]
        elapsed_ms: Option<u64>,
    },
}

impl<T> SkillOutcome<T> {
    pub(crate) fn error(error_code: SkillErrorCode, message: impl Into<String>, elapsed_ms: Option<u64>) -> Self {
        Self::Error { error_code, message: message.into(), elapsed_ms }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    #[must_use]
    pub fn error_code(&self) -> Option<SkillErrorCode> {
        match self {
            Self::Ok { .. } => None,
            Self::Error { error_code, .. } => Some(*error_code),
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> Option<u64> {
        match self {
            Self::Ok { elapsed_ms, .. } => Some(*elapsed_ms),
            Self::Error { elapsed_ms, .. } => *elapsed_ms,
        }
    }

    /// Consume into the output, dropping error details.
    pub fn into_output(self) -> Option<T> {
        match self {
            Self::Ok { output, .. } => Some(output),
            Self::Error { .. } => None,
        }
    }
}

// =============================================================================
// HEALTH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillHealth {
    pub id: String,
    pub healthy: bool,
}

/// On-demand health picture. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub dispatcher_available: bool,
    pub per_skill: Vec<SkillHealth>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
