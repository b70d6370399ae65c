//! Health probe — reachability check for every registered skill.
//!
//! A skill counts as healthy when its endpoint answers with anything other
//! than 404. Edge functions typically reject the probe body with a 4xx, and
//! that still proves the function is deployed. Transport failures are
//! unhealthy.
//!
//! Probes issue real requests. Do not call this on a tight polling loop.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use serde_json::{Value, json};

use super::types::{HealthSnapshot, SkillHealth};
use super::SkillDispatcher;

/// Reserved input marker so skills can short-circuit health probes.
pub const HEALTH_MARKER: &str = "__healthcheck";

#[must_use]
pub fn health_payload(skill_id: &str) -> Value {
    json!({ "skillId": skill_id, "input": { HEALTH_MARKER: true } })
}

impl SkillDispatcher {
    /// Probe every registered skill concurrently.
    pub async fn probe_health(&self) -> HealthSnapshot {
        let Some(endpoint) = self.config.endpoint() else {
            tracing::debug!("skills backend not configured; reporting all skills down");
            let per_skill = self.registry.iter().map(|s| SkillHealth { id: s.id.clone(), healthy: false }).collect();
            return HealthSnapshot { dispatcher_available: false, per_skill };
        };

        let probes = self.registry.iter().map(|skill| {
            let url = endpoint.url_for(&skill.endpoint_path);
            let body = health_payload(&skill.id);
            async move {
                let probe = AssertUnwindSafe(self.transport.post_json(&url, endpoint.access_key, &body));
                let healthy = match probe.catch_unwind().await {
                    Ok(Ok(response)) => response.status != 404,
                    Ok(Err(e)) => {
                        tracing::debug!(skill_id = %skill.id, error = %e, "health probe failed");
                        false
                    }
                    Err(_) => {
                        tracing::error!(skill_id = %skill.id, "health probe panicked");
                        false
                    }
                };
                SkillHealth { id: skill.id.clone(), healthy }
            }
        });
        let per_skill = join_all(probes).await;

        let dispatcher_available = per_skill.iter().any(|s| s.healthy);
        tracing::info!(
            dispatcher_available,
            healthy = per_skill.iter().filter(|s| s.healthy).count(),
            total = per_skill.len(),
            "skills health probed"
        );
        HealthSnapshot { dispatcher_available, per_skill }
    }
}
