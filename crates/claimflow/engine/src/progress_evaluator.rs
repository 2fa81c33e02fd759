//! Progress evaluator: derives step status and the actionable frontier
//!
//! Evaluation is a pure function of a template and a completed set. Nothing
//! is cached between calls; the frontier is recomputed every time, which is
//! O(steps × dependencies) over step counts in the tens.

use claimflow_types::{
    ProgressSnapshot, StepId, StepProgress, StepStatus, StepSummary, WorkflowStep,
    WorkflowTemplate,
};
use std::collections::BTreeSet;

/// Evaluates one template against one completed set
#[derive(Clone, Copy, Debug)]
pub struct ProgressEvaluator<'a> {
    template: &'a WorkflowTemplate,
    completed: &'a BTreeSet<StepId>,
}

impl<'a> ProgressEvaluator<'a> {
    pub fn new(template: &'a WorkflowTemplate, completed: &'a BTreeSet<StepId>) -> Self {
        Self {
            template,
            completed,
        }
    }

    /// Number of template steps in the completed set. IDs the template does
    /// not know are ignored.
    pub fn completed_count(&self) -> usize {
        self.template
            .steps
            .iter()
            .filter(|s| self.completed.contains(&s.id))
            .count()
    }

    /// `round(100 × completed / total)`, or 0 for a template with no steps
    pub fn completion_percentage(&self) -> u8 {
        let total = self.template.steps.len();
        if total == 0 {
            return 0;
        }
        let done = self.completed_count();
        // Round half up without going through floats
        ((200 * done + total) / (2 * total)) as u8
    }

    /// Steps that are not complete and whose dependencies all are, in
    /// template order
    pub fn next_actionable_steps(&self) -> Vec<&'a WorkflowStep> {
        self.template
            .steps
            .iter()
            .filter(|s| self.is_actionable(s))
            .collect()
    }

    /// Status of a single step.
    ///
    /// Unknown step IDs are `Pending`, never an error, so stale references
    /// from callers stay harmless.
    pub fn step_status(&self, step_id: &StepId) -> StepStatus {
        if self.completed.contains(step_id) {
            return StepStatus::Completed;
        }
        let Some(step) = self.template.get_step(step_id) else {
            return StepStatus::Pending;
        };
        let frontier = self.next_actionable_steps();
        self.classify(step, &frontier)
    }

    /// Dependencies of `step_id` that are not yet complete, declaration order
    pub fn unmet_dependencies(&self, step_id: &StepId) -> Vec<StepId> {
        self.template
            .get_step(step_id)
            .map(|step| self.unmet(step))
            .unwrap_or_default()
    }

    /// Full progress report
    pub fn snapshot(&self) -> ProgressSnapshot {
        let frontier = self.next_actionable_steps();

        let steps = self
            .template
            .steps
            .iter()
            .map(|step| StepProgress {
                step_id: step.id.clone(),
                title: step.title.clone(),
                status: self.classify(step, &frontier),
                unmet_dependencies: self.unmet(step),
            })
            .collect();

        let estimated_remaining_minutes = self
            .template
            .steps
            .iter()
            .filter(|s| !self.completed.contains(&s.id))
            .fold(0u32, |acc, s| acc.saturating_add(s.estimated_time));

        let completed_steps = self.completed_count();
        let total_steps = self.template.steps.len();

        ProgressSnapshot {
            template_id: self.template.id.clone(),
            completion_percentage: self.completion_percentage(),
            completed_steps,
            total_steps,
            next_actionable_steps: frontier.iter().map(|s| StepSummary::from(*s)).collect(),
            steps,
            estimated_remaining_minutes,
            is_complete: total_steps > 0 && completed_steps == total_steps,
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────

    fn is_actionable(&self, step: &WorkflowStep) -> bool {
        !self.completed.contains(&step.id) && self.dependencies_met(step)
    }

    fn dependencies_met(&self, step: &WorkflowStep) -> bool {
        step.dependencies.iter().all(|d| self.completed.contains(d))
    }

    fn unmet(&self, step: &WorkflowStep) -> Vec<StepId> {
        step.dependencies
            .iter()
            .filter(|d| !self.completed.contains(*d))
            .cloned()
            .collect()
    }

    fn classify(&self, step: &WorkflowStep, frontier: &[&WorkflowStep]) -> StepStatus {
        if self.completed.contains(&step.id) {
            StepStatus::Completed
        } else if !self.dependencies_met(step) {
            StepStatus::Blocked
        } else if frontier.iter().any(|s| s.id == step.id) {
            StepStatus::Active
        } else {
            // Dependencies met but not selected as next; unreachable while
            // the frontier is exactly the set of eligible steps
            StepStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn completed(ids: &[&str]) -> BTreeSet<StepId> {
        ids.iter().map(|s| StepId::new(*s)).collect()
    }

    fn next_ids(evaluator: &ProgressEvaluator<'_>) -> Vec<String> {
        evaluator
            .next_actionable_steps()
            .iter()
            .map(|s| s.id.to_string())
            .collect()
    }

    #[test]
    fn test_new_claim_empty_progress() {
        let template = catalog::new_claim_submission();
        let done = completed(&[]);
        let eval = ProgressEvaluator::new(&template, &done);

        assert_eq!(eval.completion_percentage(), 0);
        assert_eq!(next_ids(&eval), vec!["data-input"]);
        assert_eq!(
            eval.step_status(&StepId::new("eligibility-check")),
            StepStatus::Blocked
        );
        assert_eq!(eval.step_status(&StepId::new("ai-coding")), StepStatus::Blocked);
        assert_eq!(
            eval.step_status(&StepId::new("cost-estimation")),
            StepStatus::Blocked
        );
        assert_eq!(eval.step_status(&StepId::new("data-input")), StepStatus::Active);
    }

    #[test]
    fn test_new_claim_after_intake_and_coding() {
        let template = catalog::new_claim_submission();
        let done = completed(&["data-input", "ai-coding"]);
        let eval = ProgressEvaluator::new(&template, &done);

        assert_eq!(next_ids(&eval), vec!["eligibility-check", "code-review"]);
        assert_eq!(
            eval.step_status(&StepId::new("claim-submission")),
            StepStatus::Blocked
        );
        assert_eq!(eval.completion_percentage(), 33);
    }

    #[test]
    fn test_new_claim_all_complete() {
        let template = catalog::new_claim_submission();
        let done: BTreeSet<StepId> = template.steps.iter().map(|s| s.id.clone()).collect();
        let eval = ProgressEvaluator::new(&template, &done);

        assert_eq!(eval.completion_percentage(), 100);
        assert!(eval.next_actionable_steps().is_empty());

        let snapshot = eval.snapshot();
        assert!(snapshot.is_complete);
        assert_eq!(snapshot.estimated_remaining_minutes, 0);
    }

    #[test]
    fn test_unknown_step_is_pending() {
        let template = catalog::new_claim_submission();
        let done = completed(&["data-input"]);
        let eval = ProgressEvaluator::new(&template, &done);

        assert_eq!(
            eval.step_status(&StepId::new("no-such-step")),
            StepStatus::Pending
        );
        assert!(eval.unmet_dependencies(&StepId::new("no-such-step")).is_empty());
    }

    #[test]
    fn test_empty_template() {
        let template = WorkflowTemplate::new("empty", "Empty");
        let done = completed(&[]);
        let eval = ProgressEvaluator::new(&template, &done);

        assert_eq!(eval.completion_percentage(), 0);
        assert!(eval.next_actionable_steps().is_empty());
        assert!(!eval.snapshot().is_complete);
    }

    #[test]
    fn test_foreign_completed_ids_are_ignored() {
        let template = catalog::new_claim_submission();
        let done = completed(&["data-input", "something-else"]);
        let eval = ProgressEvaluator::new(&template, &done);

        assert_eq!(eval.completed_count(), 1);
        // 1/6 = 16.67
        assert_eq!(eval.completion_percentage(), 17);
    }

    #[test]
    fn test_rounding_half_up() {
        let template = WorkflowTemplate::new("pair", "Pair")
            .with_step(WorkflowStep::new("a", "A"))
            .with_step(WorkflowStep::new("b", "B"))
            .with_step(WorkflowStep::new("c", "C"))
            .with_step(WorkflowStep::new("d", "D"))
            .with_step(WorkflowStep::new("e", "E"))
            .with_step(WorkflowStep::new("f", "F"))
            .with_step(WorkflowStep::new("g", "G"))
            .with_step(WorkflowStep::new("h", "H"));
        // 1/8 = 12.5 rounds up to 13
        let done = completed(&["a"]);
        assert_eq!(
            ProgressEvaluator::new(&template, &done).completion_percentage(),
            13
        );
    }

    #[test]
    fn test_snapshot_details() {
        let template = catalog::new_claim_submission();
        let done = completed(&["data-input", "ai-coding"]);
        let snapshot = ProgressEvaluator::new(&template, &done).snapshot();

        assert_eq!(snapshot.completed_steps, 2);
        assert_eq!(snapshot.total_steps, 6);
        assert_eq!(snapshot.steps.len(), 6);
        assert_eq!(
            snapshot.status_of(&StepId::new("code-review")),
            StepStatus::Active
        );

        let cost = snapshot
            .steps
            .iter()
            .find(|s| s.step_id == StepId::new("cost-estimation"))
            .unwrap();
        assert_eq!(cost.status, StepStatus::Blocked);
        assert_eq!(
            cost.unmet_dependencies,
            vec![StepId::new("eligibility-check"), StepId::new("code-review")]
        );

        let remaining: u32 = template
            .steps
            .iter()
            .filter(|s| !done.contains(&s.id))
            .map(|s| s.estimated_time)
            .sum();
        assert_eq!(snapshot.estimated_remaining_minutes, remaining);
    }

    #[test]
    fn test_remaining_minutes_saturate() {
        let template = WorkflowTemplate::new("big", "Big")
            .with_step(WorkflowStep::new("a", "A").with_estimated_time(u32::MAX))
            .with_step(WorkflowStep::new("b", "B").with_estimated_time(10));
        let done = completed(&[]);
        let snapshot = ProgressEvaluator::new(&template, &done).snapshot();
        assert_eq!(snapshot.estimated_remaining_minutes, u32::MAX);

        let done = completed(&["a"]);
        let snapshot = ProgressEvaluator::new(&template, &done).snapshot();
        assert_eq!(snapshot.estimated_remaining_minutes, 10);
    }

    #[test]
    fn test_snapshot_serializes() {
        let template = catalog::new_claim_submission();
        let done = completed(&[]);
        let snapshot = ProgressEvaluator::new(&template, &done).snapshot();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["completion_percentage"], 0);
        assert_eq!(json["next_actionable_steps"][0]["id"], "data-input");
        assert_eq!(json["steps"][1]["status"], "blocked");
    }
}
