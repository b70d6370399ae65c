//! Skills — remote skill dispatcher.
//!
//! DESIGN
//! ======
//! `SkillDispatcher` is a stateless façade: registry lookup, config check,
//! one POST, normalize. Every failure mode ends up in
//! [`SkillOutcome::Error`]; nothing panics or propagates past `invoke`.
//!
//! Check order per call:
//! 1. unknown id → `unknown_skill` (no network)
//! 2. missing base URL / access key → `config_missing` (no network)
//! 3. transport failure → `network`
//! 4. non-2xx → `http_<status>` with the body (or canonical reason) as message
//! 5. 2xx → body decoded into `T`; a decode failure is reported as `network`
//!
//! No retries and no hidden state between calls. Retry policy belongs to
//! the caller, guided by [`SkillErrorCode::retryable`].

pub mod config;
pub mod health;
pub mod ops;
pub mod registry;
pub mod telemetry;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use config::SkillsConfig;
pub use registry::{SkillDescriptor, SkillRegistry};
pub use telemetry::{SkillTelemetry, TracingTelemetry};
pub use transport::{ReqwestTransport, SkillTransport, TransportError, TransportResponse};
pub use types::{CallerContext, HealthSnapshot, SkillErrorCode, SkillHealth, SkillOutcome, SkillRequest};

use telemetry::{EventStatus, SkillEvent};
use types::WireRequest;

// =============================================================================
// DISPATCHER
// =============================================================================

#[derive(Clone)]
pub struct SkillDispatcher {
    registry: Arc<SkillRegistry>,
    config: SkillsConfig,
    transport: Arc<dyn SkillTransport>,
    telemetry: Arc<dyn SkillTelemetry>,
}

impl SkillDispatcher {
    pub fn new(registry: SkillRegistry, config: SkillsConfig, transport: Arc<dyn SkillTransport>) -> Self {
        Self { registry: Arc::new(registry), config, transport, telemetry: Arc::new(TracingTelemetry) }
    }

    /// Dispatcher over reqwest using the config's timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_reqwest(registry: SkillRegistry, config: SkillsConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeouts)?;
        Ok(Self::new(registry, config, Arc::new(transport)))
    }

    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn SkillTelemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &SkillsConfig {
        &self.config
    }

    /// Convenience form of [`SkillDispatcher::invoke`].
    pub async fn run<T: DeserializeOwned>(
        &self,
        skill_id: &str,
        input: Value,
        caller_user_id: Option<&str>,
        trace_id: Option<&str>,
    ) -> SkillOutcome<T> {
        let mut request = SkillRequest::new(skill_id, input);
        if let Some(user_id) = caller_user_id {
            request = request.with_user(user_id);
        }
        if let Some(trace_id) = trace_id {
            request = request.with_trace_id(trace_id);
        }
        self.invoke(&request).await
    }

    /// Invoke one skill. At most one network attempt.
    pub async fn invoke<T: DeserializeOwned>(&self, request: &SkillRequest) -> SkillOutcome<T> {
        let outcome = self.invoke_inner(request).await;
        self.record(request, &outcome);
        outcome
    }

    async fn invoke_inner<T: DeserializeOwned>(&self, request: &SkillRequest) -> SkillOutcome<T> {
        let Some(skill) = self.registry.get(&request.skill_id) else {
            tracing::warn!(skill_id = %request.skill_id, "unknown skill");
            return SkillOutcome::error(
                SkillErrorCode::UnknownSkill,
                format!("unknown skill: {}", request.skill_id),
                None,
            );
        };

        let Some(endpoint) = self.config.endpoint() else {
            let missing = self.config.missing().join(" and ");
            tracing::debug!(skill_id = %skill.id, %missing, "skills backend not configured");
            return SkillOutcome::error(
                SkillErrorCode::ConfigMissing,
                format!("skills backend not configured: missing {missing}"),
                None,
            );
        };

        let url = endpoint.url_for(&skill.endpoint_path);
        let wire = WireRequest {
            skill_id: &skill.id,
            input: &request.input,
            user_context: request.caller_context.as_ref(),
            trace_id: request.trace_id.as_deref(),
        };
        let body = match serde_json::to_value(&wire) {
            Ok(body) => body,
            Err(e) => return SkillOutcome::error(SkillErrorCode::Network, e.to_string(), None),
        };

        let started = Instant::now();
        let result = AssertUnwindSafe(self.transport.post_json(&url, endpoint.access_key, &body)).catch_unwind().await;
        let elapsed_ms = elapsed_since(started);

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(skill_id = %skill.id, elapsed_ms, error = %e, "skill transport failed");
                return SkillOutcome::error(SkillErrorCode::Network, e.to_string(), Some(elapsed_ms));
            }
            Err(_) => {
                tracing::error!(skill_id = %skill.id, elapsed_ms, "skill transport panicked");
                return SkillOutcome::error(SkillErrorCode::Network, "transport panicked", Some(elapsed_ms));
            }
        };

        if !response.is_success() {
            let message = if response.body.trim().is_empty() { status_text(response.status) } else { response.body };
            tracing::warn!(skill_id = %skill.id, status = response.status, elapsed_ms, "skill returned error status");
            return SkillOutcome::error(SkillErrorCode::Http(response.status), message, Some(elapsed_ms));
        }

        match serde_json::from_str::<T>(&response.body) {
            Ok(output) => {
                tracing::debug!(skill_id = %skill.id, elapsed_ms, "skill call ok");
                SkillOutcome::Ok { output, elapsed_ms }
            }
            Err(e) => SkillOutcome::error(
                SkillErrorCode::Network,
                format!("response decode failed: {e}"),
                Some(elapsed_ms),
            ),
        }
    }

    fn record<T>(&self, request: &SkillRequest, outcome: &SkillOutcome<T>) {
        let payload_size = serde_json::to_string(&request.input).map_or(0, |s| s.len());
        let user_id = request.caller_context.as_ref().map(|c| c.user_id.as_str());
        let event = match outcome {
            SkillOutcome::Ok { elapsed_ms, .. } => {
                SkillEvent::new(&request.skill_id, user_id, EventStatus::Success, payload_size)
                    .with_duration(Some(*elapsed_ms))
            }
            SkillOutcome::Error { error_code, message, elapsed_ms } => {
                SkillEvent::new(&request.skill_id, user_id, EventStatus::Failure, payload_size)
                    .with_duration(*elapsed_ms)
                    .with_error(&format!("{error_code}: {message}"))
            }
        };
        if std::panic::catch_unwind(AssertUnwindSafe(|| self.telemetry.record(&event))).is_err() {
            tracing::error!(skill_id = %request.skill_id, "skill telemetry sink panicked");
        }
    }
}

fn elapsed_since(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Canonical reason phrase, e.g. `Not Found`; falls back to `HTTP <status>`.
fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map_or_else(|| format!("HTTP {status}"), str::to_string)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
