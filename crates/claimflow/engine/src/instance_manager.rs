//! Workflow instance manager: the entry point for running workflows
//!
//! The manager:
//! 1. Starts instances bound to a registered template
//! 2. Applies step completion (and rollback) events
//! 3. Answers progress queries through the [`ProgressEvaluator`]
//! 4. Supersedes instances, keeping the old record as an audit trail
//!
//! It never invokes the business action behind a step. It only reports
//! that a step is active; the caller runs the action and reports back.
//!
//! Each instance lives in its own map entry. A mutation and the snapshot
//! returned for it are computed under that entry's exclusive guard, so two
//! completions on the same instance never interleave.

use crate::progress_evaluator::ProgressEvaluator;
use crate::template_registry::TemplateRegistry;
use claimflow_types::*;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns workflow instances and coordinates their progress
#[derive(Debug)]
pub struct InstanceManager {
    /// Shared, read-only after startup
    templates: Arc<TemplateRegistry>,
    /// Active and superseded instances
    instances: DashMap<WorkflowInstanceId, WorkflowInstance>,
}

impl InstanceManager {
    pub fn new(templates: Arc<TemplateRegistry>) -> Self {
        Self {
            templates,
            instances: DashMap::new(),
        }
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    // ── Instance Lifecycle ───────────────────────────────────────────

    /// Start a new instance with nothing completed
    pub fn start(&self, template_id: &WorkflowTemplateId) -> WorkflowResult<WorkflowInstanceId> {
        self.start_with_metadata(template_id, HashMap::new())
    }

    /// Start a new instance carrying caller metadata (claim ID, case number, ...)
    pub fn start_with_metadata(
        &self,
        template_id: &WorkflowTemplateId,
        metadata: HashMap<String, String>,
    ) -> WorkflowResult<WorkflowInstanceId> {
        let template = self.templates.get(template_id)?;

        let mut instance = WorkflowInstance::new(template.id.clone());
        instance.metadata = metadata;
        let instance_id = instance.id.clone();

        tracing::info!(
            instance_id = %instance_id,
            template = %template_id,
            "Workflow instance started"
        );

        self.instances.insert(instance_id.clone(), instance);
        Ok(instance_id)
    }

    /// Retire an instance and start a fresh one on the same template.
    ///
    /// The old record stays retrievable, marked superseded.
    pub fn supersede(&self, instance_id: &WorkflowInstanceId) -> WorkflowResult<WorkflowInstanceId> {
        let replacement = {
            let mut entry = self
                .instances
                .get_mut(instance_id)
                .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))?;
            if !entry.is_active() {
                return Err(WorkflowError::InstanceSuperseded(instance_id.clone()));
            }

            let mut replacement = WorkflowInstance::new(entry.template_id.clone());
            replacement.metadata = entry.metadata.clone();
            entry.supersede(replacement.id.clone());
            replacement
        };

        let replacement_id = replacement.id.clone();
        tracing::info!(
            instance_id = %instance_id,
            replacement = %replacement_id,
            "Workflow instance superseded"
        );
        self.instances.insert(replacement_id.clone(), replacement);
        Ok(replacement_id)
    }

    // ── Completion Events ────────────────────────────────────────────

    /// Mark a step complete and return the refreshed snapshot.
    ///
    /// Completing an already completed step is a no-op, not an error.
    pub fn mark_step_complete(
        &self,
        instance_id: &WorkflowInstanceId,
        step_id: &StepId,
    ) -> WorkflowResult<ProgressSnapshot> {
        let mut entry = self
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))?;
        let instance = entry.value_mut();
        let template = self.mutable_template(instance, step_id)?;

        if instance.mark_completed(step_id.clone()) {
            tracing::debug!(instance_id = %instance.id.short(), step = %step_id, "Step completed");
        } else {
            tracing::debug!(
                instance_id = %instance.id.short(),
                step = %step_id,
                "Step already completed"
            );
        }

        Ok(ProgressEvaluator::new(template, &instance.completed_step_ids).snapshot())
    }

    /// Roll back a completion and return the refreshed snapshot.
    ///
    /// Un-completing a step that is not complete is a no-op.
    pub fn unmark_step_complete(
        &self,
        instance_id: &WorkflowInstanceId,
        step_id: &StepId,
    ) -> WorkflowResult<ProgressSnapshot> {
        let mut entry = self
            .instances
            .get_mut(instance_id)
            .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))?;
        let instance = entry.value_mut();
        let template = self.mutable_template(instance, step_id)?;

        if instance.mark_uncompleted(step_id) {
            tracing::debug!(instance_id = %instance.id.short(), step = %step_id, "Step rolled back");
        }

        Ok(ProgressEvaluator::new(template, &instance.completed_step_ids).snapshot())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current progress snapshot
    pub fn get_progress(&self, instance_id: &WorkflowInstanceId) -> WorkflowResult<ProgressSnapshot> {
        let entry = self.entry(instance_id)?;
        let template = self.templates.get(&entry.template_id)?;
        Ok(ProgressEvaluator::new(template, &entry.completed_step_ids).snapshot())
    }

    /// Status of one step. Step IDs the template does not know are `Pending`.
    pub fn step_status(
        &self,
        instance_id: &WorkflowInstanceId,
        step_id: &StepId,
    ) -> WorkflowResult<StepStatus> {
        let entry = self.entry(instance_id)?;
        let template = self.templates.get(&entry.template_id)?;
        Ok(ProgressEvaluator::new(template, &entry.completed_step_ids).step_status(step_id))
    }

    /// The actionable frontier, template order
    pub fn next_actionable_steps(
        &self,
        instance_id: &WorkflowInstanceId,
    ) -> WorkflowResult<Vec<StepSummary>> {
        let entry = self.entry(instance_id)?;
        let template = self.templates.get(&entry.template_id)?;
        Ok(ProgressEvaluator::new(template, &entry.completed_step_ids)
            .next_actionable_steps()
            .into_iter()
            .map(StepSummary::from)
            .collect())
    }

    /// A copy of the instance record, audit history included
    pub fn get_instance(&self, instance_id: &WorkflowInstanceId) -> WorkflowResult<WorkflowInstance> {
        Ok(self.entry(instance_id)?.value().clone())
    }

    /// Instances, optionally filtered by template, oldest first
    pub fn list_instances(&self, template_id: Option<&WorkflowTemplateId>) -> Vec<WorkflowInstance> {
        let mut instances: Vec<WorkflowInstance> = self
            .instances
            .iter()
            .filter(|i| template_id.map_or(true, |t| &i.template_id == t))
            .map(|i| i.value().clone())
            .collect();
        instances.sort_by_key(|i| i.created_at);
        instances
    }

    /// Total number of instances (active + superseded)
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn entry(
        &self,
        instance_id: &WorkflowInstanceId,
    ) -> WorkflowResult<dashmap::mapref::one::Ref<'_, WorkflowInstanceId, WorkflowInstance>> {
        self.instances
            .get(instance_id)
            .ok_or_else(|| WorkflowError::InstanceNotFound(instance_id.clone()))
    }

    /// Resolve the template for a mutation, rejecting superseded instances
    /// and steps the template does not define
    fn mutable_template(
        &self,
        instance: &WorkflowInstance,
        step_id: &StepId,
    ) -> WorkflowResult<&WorkflowTemplate> {
        if !instance.is_active() {
            return Err(WorkflowError::InstanceSuperseded(instance.id.clone()));
        }
        let template = self.templates.get(&instance.template_id)?;
        if !template.contains_step(step_id) {
            return Err(WorkflowError::UnknownStep {
                template_id: template.id.clone(),
                step_id: step_id.clone(),
            });
        }
        Ok(template)
    }
}
