//! Ops skill helpers — typed wrappers over the dispatcher for the ops hub.
//!
//! Each helper invokes one skill, checks the outcome and fills defaults.
//! Persisting the result (task rows, SOP rows) is left to the caller.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{SkillDispatcher, SkillErrorCode, SkillOutcome};
use crate::error::ErrorCode;

const TITLE_FALLBACK_CHARS: usize = 64;
const DEFAULT_PRIORITY: &str = "medium";
const SOP_VERSION: &str = "1.0";
const INSIGHTS_LOOKBACK_DAYS: u32 = 7;

#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    #[error("no user")]
    NoUser,
    #[error("{skill_id} failed ({code}): {message}")]
    Skill { skill_id: &'static str, code: SkillErrorCode, message: String },
}

impl ErrorCode for OpsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoUser => "E_NO_USER",
            Self::Skill { .. } => "E_SKILL_FAILED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Skill { code, .. } if code.retryable())
    }
}

// =============================================================================
// WIRE OUTPUTS
// =============================================================================

// Skills may answer `null` for the whole output or for any list field;
// both decode to the empty default.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskExtractorOutput {
    title: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    subtasks: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SopParserOutput {
    #[serde(default)]
    steps: Value,
    #[serde(default)]
    issues: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowRunnerOutput {
    run_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MetricsOutput {
    #[serde(default)]
    insights: Option<Vec<String>>,
}

// =============================================================================
// RESULTS
// =============================================================================

/// A task ready to be stored, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub priority: String,
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    pub subtasks: Vec<String>,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SopDraft {
    pub title: String,
    pub steps: Value,
    pub issues: Vec<String>,
    pub version: &'static str,
}

// =============================================================================
// HELPERS
// =============================================================================

pub struct OpsSkills<'a> {
    dispatcher: &'a SkillDispatcher,
    user_id: Option<String>,
}

impl<'a> OpsSkills<'a> {
    pub fn new(dispatcher: &'a SkillDispatcher, user_id: Option<String>) -> Self {
        Self { dispatcher, user_id }
    }

    /// Turn a free-form note into a task draft via `task_extractor`.
    ///
    /// # Errors
    ///
    /// [`OpsError::NoUser`] without a user, [`OpsError::Skill`] on any non-ok outcome.
    pub async fn quick_task_from_note(&self, note: &str) -> Result<TaskDraft, OpsError> {
        let out = self
            .call::<Option<TaskExtractorOutput>>("task_extractor", json!({ "text": note }))
            .await?
            .unwrap_or_default();
        Ok(TaskDraft {
            title: out
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| note.chars().take(TITLE_FALLBACK_CHARS).collect()),
            priority: out.priority.filter(|p| !p.is_empty()).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            due_date: out.due_date,
            tags: out.tags.unwrap_or_default(),
            subtasks: out.subtasks.unwrap_or_default(),
            status: "todo",
        })
    }

    /// # Errors
    ///
    /// [`OpsError::NoUser`] without a user, [`OpsError::Skill`] on any non-ok outcome.
    pub async fn generate_sop_steps(&self, title: &str, draft: &str) -> Result<SopDraft, OpsError> {
        let out: SopParserOutput = self.call("sop_parser", json!({ "title": title, "draft": draft })).await?;
        Ok(SopDraft {
            title: title.to_string(),
            steps: out.steps,
            issues: out.issues.unwrap_or_default(),
            version: SOP_VERSION,
        })
    }

    /// Start a named workflow. Returns the remote run id when one is reported.
    ///
    /// # Errors
    ///
    /// [`OpsError::NoUser`] without a user, [`OpsError::Skill`] on any non-ok outcome.
    pub async fn run_workflow(&self, name: &str, payload: Option<Value>) -> Result<Option<String>, OpsError> {
        tracing::info!(workflow = name, "ops workflow start");
        let out = self
            .call::<Option<WorkflowRunnerOutput>>("workflow_runner", json!({ "name": name, "payload": payload }))
            .await?
            .unwrap_or_default();
        tracing::info!(workflow = name, run_id = out.run_id.as_deref().unwrap_or("-"), "ops workflow complete");
        Ok(out.run_id)
    }

    /// # Errors
    ///
    /// [`OpsError::NoUser`] without a user, [`OpsError::Skill`] on any non-ok outcome.
    pub async fn schedule_workflow_cron(&self, name: &str, cron: &str) -> Result<(), OpsError> {
        let _: Value = self.call("scheduler", json!({ "name": name, "cron": cron })).await?;
        Ok(())
    }

    /// Insights over the last seven days.
    ///
    /// # Errors
    ///
    /// [`OpsError::NoUser`] without a user, [`OpsError::Skill`] on any non-ok outcome.
    pub async fn ops_insights(&self) -> Result<Vec<String>, OpsError> {
        let out = self
            .call::<Option<MetricsOutput>>("metrics_aggregator", json!({ "lookbackDays": INSIGHTS_LOOKBACK_DAYS }))
            .await?
            .unwrap_or_default();
        Ok(out.insights.unwrap_or_default())
    }

    async fn call<T: serde::de::DeserializeOwned>(&self, skill_id: &'static str, input: Value) -> Result<T, OpsError> {
        let user_id = self.user_id.as_deref().ok_or(OpsError::NoUser)?;
        match self.dispatcher.run::<T>(skill_id, input, Some(user_id), None).await {
            SkillOutcome::Ok { output, .. } => Ok(output),
            SkillOutcome::Error { error_code, message, .. } => {
                Err(OpsError::Skill { skill_id, code: error_code, message })
            }
        }
    }
}

#[cfg(test)]
#[path = "ops_test.rs"]
mod tests;
