//! Workflow templates: named graphs of steps
//!
//! Templates are defined once at startup and never mutated after
//! registration. Step order is the canonical display and tie-break order.

use crate::{StepId, WorkflowStep};
use serde::{Deserialize, Serialize};

// ── Identifier ───────────────────────────────────────────────────────

/// Identifier of a workflow template
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkflowTemplateId(pub String);

impl WorkflowTemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkflowTemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkflowTemplateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ── Workflow Template ────────────────────────────────────────────────

/// An immutable, named definition of a workflow's steps and their dependencies
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub id: WorkflowTemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Steps in canonical order
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: WorkflowTemplateId::new(id),
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a step. Structural checks happen at registration, not here.
    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Get a step by ID
    pub fn get_step(&self, id: &StepId) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| &s.id == id)
    }

    pub fn contains_step(&self, id: &StepId) -> bool {
        self.get_step(id).is_some()
    }

    /// Step IDs in template order
    pub fn step_ids(&self) -> Vec<&StepId> {
        self.steps.iter().map(|s| &s.id).collect()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Sum of all step estimates in minutes, saturating at `u32::MAX`
    pub fn estimated_total_time(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.estimated_time))
    }

    /// Steps that list `id` as a dependency, in template order
    pub fn dependents_of(&self, id: &StepId) -> Vec<&WorkflowStep> {
        self.steps
            .iter()
            .filter(|s| s.dependencies.contains(id))
            .collect()
    }

    /// Steps with no dependencies
    pub fn root_steps(&self) -> Vec<&WorkflowStep> {
        self.steps.iter().filter(|s| s.is_root()).collect()
    }
}
