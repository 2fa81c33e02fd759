//! Dependency graph validator: structural checks run once per template
//!
//! Checks run in a fixed order and the first violation wins:
//! 1. step IDs are unique
//! 2. every dependency names a step in the same template
//! 3. the dependency relation is acyclic (self-loops included)

use claimflow_types::{StepId, TemplateValidationError, WorkflowTemplate};
use std::collections::{HashMap, HashSet};

/// Validate a template's step graph
pub fn validate_template(template: &WorkflowTemplate) -> Result<(), TemplateValidationError> {
    check_unique_ids(template)?;
    check_dependencies_exist(template)?;
    if let Some(cycle) = find_cycle(template) {
        return Err(TemplateValidationError::CyclicDependency { cycle });
    }
    Ok(())
}

/// Order steps so each comes after all of its dependencies.
///
/// Ties are broken by template order: at every point the earliest step
/// whose dependencies are already placed goes next.
pub fn topological_order(
    template: &WorkflowTemplate,
) -> Result<Vec<StepId>, TemplateValidationError> {
    validate_template(template)?;

    let mut placed: HashSet<&StepId> = HashSet::new();
    let mut order = Vec::with_capacity(template.steps.len());

    while order.len() < template.steps.len() {
        let next = template.steps.iter().find(|step| {
            !placed.contains(&step.id) && step.dependencies.iter().all(|d| placed.contains(d))
        });
        match next {
            Some(step) => {
                placed.insert(&step.id);
                order.push(step.id.clone());
            }
            // Unreachable once validation has passed
            None => break,
        }
    }

    Ok(order)
}

fn check_unique_ids(template: &WorkflowTemplate) -> Result<(), TemplateValidationError> {
    let mut seen = HashSet::new();
    for step in &template.steps {
        if !seen.insert(&step.id) {
            return Err(TemplateValidationError::DuplicateStepId {
                step_id: step.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_dependencies_exist(template: &WorkflowTemplate) -> Result<(), TemplateValidationError> {
    let ids: HashSet<&StepId> = template.steps.iter().map(|s| &s.id).collect();
    for step in &template.steps {
        for dependency in &step.dependencies {
            if !ids.contains(dependency) {
                return Err(TemplateValidationError::UnknownDependency {
                    step_id: step.id.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Depth-first search over step -> dependency edges.
///
/// Returns the step IDs along the first cycle found, starting at the step
/// that closes it. The walk keeps its own stack so chain length is not
/// bounded by the thread's call stack.
fn find_cycle(template: &WorkflowTemplate) -> Option<Vec<StepId>> {
    let index: HashMap<&StepId, usize> = template
        .steps
        .iter()
        .enumerate()
        .map(|(i, s)| (&s.id, i))
        .collect();
    let mut marks = vec![Mark::Unvisited; template.steps.len()];
    // (step, next dependency to look at); doubles as the current DFS path
    let mut path: Vec<(usize, usize)> = Vec::new();

    for start in 0..template.steps.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnPath;
        path.push((start, 0));

        while let Some((node, cursor)) = path.last_mut() {
            let node = *node;
            let Some(dependency) = template.steps[node].dependencies.get(*cursor) else {
                marks[node] = Mark::Done;
                path.pop();
                continue;
            };
            *cursor += 1;

            let Some(&next) = index.get(dependency) else {
                continue;
            };
            match marks[next] {
                Mark::OnPath => {
                    let from = path.iter().position(|&(n, _)| n == next).unwrap_or(0);
                    return Some(
                        path[from..]
                            .iter()
                            .map(|&(i, _)| template.steps[i].id.clone())
                            .collect(),
                    );
                }
                Mark::Unvisited => {
                    marks[next] = Mark::OnPath;
                    path.push((next, 0));
                }
                Mark::Done => {}
            }
        }
    }
    None
}
