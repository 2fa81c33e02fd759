//! Property tests: progress evaluation over arbitrary acyclic templates.
//!
//! Templates are generated so that a step may only depend on steps generated
//! before it, which makes every generated graph acyclic. Declaration order is
//! optionally reversed so validation never relies on dependency-first order.

use claimflow_engine::graph_validator::validate_template;
use claimflow_engine::{InstanceManager, ProgressEvaluator, TemplateRegistry};
use claimflow_types::*;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn step_name(i: usize) -> String {
    format!("s{}", i)
}

/// Generate an acyclic template with 1 to 11 steps.
fn arb_template() -> impl Strategy<Value = WorkflowTemplate> {
    (1usize..12)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), n), n),
                any::<bool>(),
            )
        })
        .prop_map(|(masks, reversed)| {
            let mut steps: Vec<WorkflowStep> = masks
                .iter()
                .enumerate()
                .map(|(i, mask)| {
                    let mut step = WorkflowStep::new(step_name(i), format!("Step {}", i))
                        .with_estimated_time(i as u32 + 1);
                    for (j, depends) in mask.iter().enumerate().take(i) {
                        if *depends {
                            step = step.depends_on(step_name(j));
                        }
                    }
                    step
                })
                .collect();
            if reversed {
                steps.reverse();
            }
            steps
                .into_iter()
                .fold(WorkflowTemplate::new("generated", "Generated"), |t, s| {
                    t.with_step(s)
                })
        })
}

/// Generate a template together with an arbitrary subset of its steps.
fn arb_template_and_completed() -> impl Strategy<Value = (WorkflowTemplate, BTreeSet<StepId>)> {
    arb_template()
        .prop_flat_map(|template| {
            let n = template.step_count();
            (Just(template), prop::collection::vec(any::<bool>(), n))
        })
        .prop_map(|(template, mask)| {
            let completed = template
                .steps
                .iter()
                .zip(mask)
                .filter(|(_, done)| *done)
                .map(|(s, _)| s.id.clone())
                .collect();
            (template, completed)
        })
}

fn frontier_ids(template: &WorkflowTemplate, completed: &BTreeSet<StepId>) -> Vec<StepId> {
    ProgressEvaluator::new(template, completed)
        .next_actionable_steps()
        .iter()
        .map(|s| s.id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every generated template passes validation.
    #[test]
    fn generated_templates_are_valid(template in arb_template()) {
        prop_assert!(validate_template(&template).is_ok());
    }

    /// A step is in the frontier iff it is not completed and all of its
    /// dependencies are.
    #[test]
    fn frontier_matches_eligibility((template, completed) in arb_template_and_completed()) {
        let frontier = frontier_ids(&template, &completed);
        for step in &template.steps {
            let eligible = !completed.contains(&step.id)
                && step.dependencies.iter().all(|d| completed.contains(d));
            prop_assert_eq!(frontier.contains(&step.id), eligible, "step {}", step.id);
        }
    }

    /// The frontier keeps template order.
    #[test]
    fn frontier_is_in_template_order((template, completed) in arb_template_and_completed()) {
        let frontier = frontier_ids(&template, &completed);
        let positions: Vec<usize> = frontier
            .iter()
            .filter_map(|id| template.steps.iter().position(|s| &s.id == id))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    /// With nothing completed, every dependency-free step is actionable.
    #[test]
    fn root_steps_start_actionable(template in arb_template()) {
        let frontier = frontier_ids(&template, &BTreeSet::new());
        for root in template.root_steps() {
            prop_assert!(frontier.contains(&root.id));
        }
    }

    /// Adding a completion never lowers the percentage.
    #[test]
    fn percentage_is_monotonic(
        (template, completed) in arb_template_and_completed(),
        pick in any::<prop::sample::Index>(),
    ) {
        let before = ProgressEvaluator::new(&template, &completed).completion_percentage();

        let extra = &template.steps[pick.index(template.step_count())].id;
        let mut grown = completed.clone();
        grown.insert(extra.clone());
        let after = ProgressEvaluator::new(&template, &grown).completion_percentage();

        prop_assert!(after >= before);
    }

    /// Percentage stays within bounds and reaches 100 exactly when done.
    #[test]
    fn percentage_bounds((template, completed) in arb_template_and_completed()) {
        let snapshot = ProgressEvaluator::new(&template, &completed).snapshot();
        prop_assert!(snapshot.completion_percentage <= 100);
        prop_assert_eq!(
            snapshot.completion_percentage == 100,
            completed.len() == template.step_count()
        );
        prop_assert_eq!(snapshot.is_complete, completed.len() == template.step_count());
        // An unfinished acyclic workflow always has something to do
        prop_assert!(snapshot.is_complete || !snapshot.next_actionable_steps.is_empty());
    }

    /// Known steps are never left in the residual pending state, and the
    /// active ones are exactly the frontier.
    #[test]
    fn statuses_agree_with_frontier((template, completed) in arb_template_and_completed()) {
        let snapshot = ProgressEvaluator::new(&template, &completed).snapshot();
        let frontier = snapshot.next_step_ids();
        for line in &snapshot.steps {
            prop_assert_ne!(line.status, StepStatus::Pending);
            prop_assert_eq!(line.status == StepStatus::Active, frontier.contains(&&line.step_id));
            prop_assert_eq!(line.status == StepStatus::Blocked, !line.unmet_dependencies.is_empty()
                && !completed.contains(&line.step_id));
        }
    }

    /// Marking every step twice leaves the same state as marking it once.
    #[test]
    fn completion_is_idempotent((template, completed) in arb_template_and_completed()) {
        let mut registry = TemplateRegistry::new();
        let template_id = registry.register(template).unwrap();
        let manager = InstanceManager::new(Arc::new(registry));

        let once = manager.start(&template_id).unwrap();
        let twice = manager.start(&template_id).unwrap();
        for step_id in &completed {
            manager.mark_step_complete(&once, step_id).unwrap();
            manager.mark_step_complete(&twice, step_id).unwrap();
            manager.mark_step_complete(&twice, step_id).unwrap();
        }

        prop_assert_eq!(manager.get_progress(&once).unwrap(), manager.get_progress(&twice).unwrap());
        prop_assert_eq!(
            manager.get_instance(&once).unwrap().completed_step_ids,
            manager.get_instance(&twice).unwrap().completed_step_ids
        );
    }

    /// A self-loop anywhere is rejected, naming just that step.
    #[test]
    fn self_loop_is_rejected(
        template in arb_template(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut template = template;
        let i = pick.index(template.step_count());
        let looped = template.steps[i].id.clone();
        template.steps[i].dependencies.push(looped.clone());

        let mut registry = TemplateRegistry::new();
        let err = registry.register(template).unwrap_err();
        prop_assert_eq!(
            err.validation_reason(),
            Some(&TemplateValidationError::CyclicDependency { cycle: vec![looped] })
        );
        prop_assert_eq!(registry.count(), 0);
    }
}
