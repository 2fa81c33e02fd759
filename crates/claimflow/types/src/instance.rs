//! Workflow instances: one running execution of a template
//!
//! An instance only records which steps are complete. Step status, the
//! actionable frontier and the completion percentage are always derived
//! from that set, never stored.

use crate::{StepId, WorkflowTemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// ── Instance Identifier ──────────────────────────────────────────────

/// Opaque identifier of a workflow instance
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowInstanceId(pub String);

impl WorkflowInstanceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// First 8 characters, for log lines
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(8)
            .map_or(&self.0[..], |(i, _)| &self.0[..i])
    }
}

impl std::fmt::Display for WorkflowInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Workflow Instance ────────────────────────────────────────────────

/// A running (or superseded) execution of a workflow template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: WorkflowInstanceId,
    /// Reference into the template registry
    pub template_id: WorkflowTemplateId,
    /// Completed step IDs; a set, so repeats collapse
    pub completed_step_ids: BTreeSet<StepId>,
    /// Every effective completion change, in order
    pub history: Vec<CompletionEvent>,
    pub state: InstanceState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The instance that replaced this one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<WorkflowInstanceId>,
    /// Caller context such as a claim or case number
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl WorkflowInstance {
    pub fn new(template_id: WorkflowTemplateId) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowInstanceId::generate(),
            template_id,
            completed_step_ids: BTreeSet::new(),
            history: Vec::new(),
            state: InstanceState::Active,
            created_at: now,
            updated_at: now,
            superseded_by: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Record a step as complete. Returns false if it already was.
    pub fn mark_completed(&mut self, step_id: StepId) -> bool {
        if !self.completed_step_ids.insert(step_id.clone()) {
            return false;
        }
        self.record(step_id, CompletionKind::Completed);
        true
    }

    /// Roll back a completion. Returns false if the step was not complete.
    pub fn mark_uncompleted(&mut self, step_id: &StepId) -> bool {
        if !self.completed_step_ids.remove(step_id) {
            return false;
        }
        self.record(step_id.clone(), CompletionKind::Uncompleted);
        true
    }

    /// Retire this instance in favour of `replacement`. The record is kept.
    pub fn supersede(&mut self, replacement: WorkflowInstanceId) {
        self.state = InstanceState::Superseded;
        self.superseded_by = Some(replacement);
        self.updated_at = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.state == InstanceState::Active
    }

    pub fn is_completed(&self, step_id: &StepId) -> bool {
        self.completed_step_ids.contains(step_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed_step_ids.len()
    }

    fn record(&mut self, step_id: StepId, kind: CompletionKind) {
        let now = Utc::now();
        self.history.push(CompletionEvent {
            sequence: self.history.len() as u64,
            step_id,
            kind,
            recorded_at: now,
        });
        self.updated_at = now;
    }
}

// ── Instance State ───────────────────────────────────────────────────

/// Lifecycle state of an instance. Instances are never deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstanceState {
    #[default]
    Active,
    /// Replaced by a newer instance; kept read-only as an audit trail
    Superseded,
}

// ── Completion Events ────────────────────────────────────────────────

/// One entry in an instance's audit trail
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub sequence: u64,
    pub step_id: StepId,
    pub kind: CompletionKind,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Completed,
    Uncompleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance() {
        let instance = WorkflowInstance::new(WorkflowTemplateId::new("era-processing"))
            .with_metadata("claim_id", "CLM-TEST-001");

        assert!(instance.is_active());
        assert_eq!(instance.completed_count(), 0);
        assert!(instance.history.is_empty());
        assert_eq!(instance.metadata.get("claim_id").unwrap(), "CLM-TEST-001");
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let mut instance = WorkflowInstance::new(WorkflowTemplateId::new("t"));

        assert!(instance.mark_completed(StepId::new("a")));
        assert!(!instance.mark_completed(StepId::new("a")));

        assert_eq!(instance.completed_count(), 1);
        assert_eq!(instance.history.len(), 1);
        assert_eq!(instance.history[0].kind, CompletionKind::Completed);
    }

    #[test]
    fn test_mark_uncompleted() {
        let mut instance = WorkflowInstance::new(WorkflowTemplateId::new("t"));
        instance.mark_completed(StepId::new("a"));

        assert!(instance.mark_uncompleted(&StepId::new("a")));
        assert!(!instance.mark_uncompleted(&StepId::new("a")));
        assert!(!instance.is_completed(&StepId::new("a")));

        let kinds: Vec<_> = instance.history.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![CompletionKind::Completed, CompletionKind::Uncompleted]
        );
        assert_eq!(instance.history[1].sequence, 1);
    }

    #[test]
    fn test_supersede() {
        let mut instance = WorkflowInstance::new(WorkflowTemplateId::new("t"));
        let replacement = WorkflowInstanceId::generate();
        instance.supersede(replacement.clone());

        assert!(!instance.is_active());
        assert_eq!(instance.state, InstanceState::Superseded);
        assert_eq!(instance.superseded_by, Some(replacement));
    }

    #[test]
    fn test_instance_id() {
        let id = WorkflowInstanceId::generate();
        assert!(!id.0.is_empty());
        assert!(id.short().len() <= 8);
        assert_eq!(format!("{}", WorkflowInstanceId::new("abc")), "abc");
    }

    #[test]
    fn test_short_id_respects_char_boundaries() {
        assert_eq!(WorkflowInstanceId::new("abc").short(), "abc");
        assert_eq!(WorkflowInstanceId::new("0123456789").short(), "01234567");
        // 'é' is two bytes, so byte 8 falls inside a character
        let id = WorkflowInstanceId::new("abcdefgéxyz");
        assert_eq!(id.short(), "abcdefgé");
    }
}
