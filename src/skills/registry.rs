//! Skill registry — static map from skill id to edge-function path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("duplicate skill id: {0}")]
    DuplicateId(String),
    #[error("skill {id} has an empty {field}")]
    EmptyField { id: String, field: &'static str },
    #[error("registry read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_REGISTRY_PARSE",
            Self::DuplicateId(_) => "E_REGISTRY_DUPLICATE",
            Self::EmptyField { .. } => "E_REGISTRY_EMPTY_FIELD",
            Self::Io(_) => "E_REGISTRY_IO",
        }
    }
}

/// One registered skill. `expected_latency_ms` is advisory and never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDescriptor {
    pub id: String,
    pub endpoint_path: String,
    #[serde(default)]
    pub expected_latency_ms: Option<u64>,
}

impl SkillDescriptor {
    pub fn new(id: impl Into<String>, endpoint_path: impl Into<String>, expected_latency_ms: u64) -> Self {
        Self { id: id.into(), endpoint_path: endpoint_path.into(), expected_latency_ms: Some(expected_latency_ms) }
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    skills: Vec<SkillDescriptor>,
}

/// Immutable once built. Iteration order is by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillRegistry {
    skills: BTreeMap<String, SkillDescriptor>,
}

impl SkillRegistry {
    /// Build from descriptors, rejecting duplicate ids and empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] or [`RegistryError::EmptyField`].
    pub fn new(descriptors: impl IntoIterator<Item = SkillDescriptor>) -> Result<Self, RegistryError> {
        let mut skills = BTreeMap::new();
        for descriptor in descriptors {
            if descriptor.id.trim().is_empty() {
                return Err(RegistryError::EmptyField { id: descriptor.id, field: "id" });
            }
            if descriptor.endpoint_path.trim().is_empty() {
                return Err(RegistryError::EmptyField { id: descriptor.id, field: "endpointPath" });
            }
            if skills.contains_key(&descriptor.id) {
                return Err(RegistryError::DuplicateId(descriptor.id));
            }
            skills.insert(descriptor.id.clone(), descriptor);
        }
        Ok(Self { skills })
    }

    /// The skills the ops and cognitive hubs call.
    #[must_use]
    pub fn builtin() -> Self {
        let skills = [
            SkillDescriptor::new("task_extractor", "ops-skills/task-extractor", 1500),
            SkillDescriptor::new("sop_parser", "ops-skills/sop-parser", 2500),
            SkillDescriptor::new("workflow_runner", "ops-skills/workflow-runner", 3000),
            SkillDescriptor::new("scheduler", "ops-skills/scheduler", 800),
            SkillDescriptor::new("metrics_aggregator", "ops-skills/metrics-aggregator", 2000),
            SkillDescriptor::new("sentiment", "cognitive-skills/sentiment", 1200),
            SkillDescriptor::new("topics", "cognitive-skills/topics", 1800),
        ];
        Self { skills: skills.into_iter().map(|d| (d.id.clone(), d)).collect() }
    }

    /// Parse a YAML document of the form `skills: [{id, endpointPath, expectedLatencyMs?}]`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] on malformed YAML or invalid descriptors.
    pub fn from_yaml_str(raw: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_yaml::from_str(raw)?;
        Self::new(file.skills)
    }

    /// # Errors
    ///
    /// Returns a [`RegistryError`] if the file cannot be read or parsed.
    pub async fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self, RegistryError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_yaml_str(&raw)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SkillDescriptor> {
        self.skills.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
