//! Progress reporting types
//!
//! These are the data structures handed back to callers for rendering or
//! persisting. They carry no behavior beyond construction.

use crate::{StepId, WorkflowStep, WorkflowTemplateId};
use serde::{Deserialize, Serialize};

// ── Step Status ──────────────────────────────────────────────────────

/// Derived status of a single step under a completed set.
///
/// `Pending` is also returned for step IDs the template does not know.
/// A known step whose dependencies are met is always `Active` under the
/// current eligibility rule; `Pending` stays distinct so the rule can
/// later separate "dependencies met" from "selected as next".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Active,
    Blocked,
    Completed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Step Summary ─────────────────────────────────────────────────────

/// Display summary of a step, as listed in the actionable frontier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    pub id: StepId,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub required: bool,
    pub estimated_time: u32,
}

impl From<&WorkflowStep> for StepSummary {
    fn from(step: &WorkflowStep) -> Self {
        Self {
            id: step.id.clone(),
            title: step.title.clone(),
            description: step.description.clone(),
            icon: step.icon.clone(),
            action: step.action.clone(),
            required: step.required,
            estimated_time: step.estimated_time,
        }
    }
}

// ── Step Progress ────────────────────────────────────────────────────

/// Status line for one step of a snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub step_id: StepId,
    pub title: String,
    pub status: StepStatus,
    /// Dependencies not yet complete, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet_dependencies: Vec<StepId>,
}

// ── Progress Snapshot ────────────────────────────────────────────────

/// Everything a caller needs to render where a workflow stands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub template_id: WorkflowTemplateId,
    /// 0 to 100
    pub completion_percentage: u8,
    pub completed_steps: usize,
    pub total_steps: usize,
    /// Template order
    pub next_actionable_steps: Vec<StepSummary>,
    /// One entry per template step, template order
    pub steps: Vec<StepProgress>,
    /// Sum of estimates over steps not yet complete
    pub estimated_remaining_minutes: u32,
    pub is_complete: bool,
}

impl ProgressSnapshot {
    /// Status of a step in this snapshot; unknown IDs are `Pending`
    pub fn status_of(&self, step_id: &StepId) -> StepStatus {
        self.steps
            .iter()
            .find(|s| &s.step_id == step_id)
            .map(|s| s.status)
            .unwrap_or(StepStatus::Pending)
    }

    /// IDs of the actionable frontier, template order
    pub fn next_step_ids(&self) -> Vec<&StepId> {
        self.next_actionable_steps.iter().map(|s| &s.id).collect()
    }
}
