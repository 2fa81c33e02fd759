//! Progress evaluation commands
//!
//! Each invocation starts a throwaway instance, replays the given
//! completions in order and reports where the workflow stands.

use crate::error::{CliError, CliResult};
use crate::output::{self, print_info, OutputFormat};
use claimflow_engine::InstanceManager;
use claimflow_types::{
    ProgressSnapshot, StepId, StepProgress, StepStatus, WorkflowInstanceId, WorkflowTemplateId,
};
use colored::*;
use serde::Serialize;
use tabled::Tabled;

/// Table row for a step status line
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    step: String,
    title: String,
    status: StepStatus,
    #[tabled(rename = "waiting on")]
    waiting_on: String,
}

impl From<&StepProgress> for StatusRow {
    fn from(line: &StepProgress) -> Self {
        let waiting_on = line
            .unmet_dependencies
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            step: line.step_id.to_string(),
            title: line.title.clone(),
            status: line.status,
            waiting_on,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    template_id: &'a str,
    step_id: &'a str,
    status: StepStatus,
}

/// Report progress after applying `completed` in order
pub fn progress(
    manager: &InstanceManager,
    template_id: &str,
    completed: &[String],
    format: OutputFormat,
) -> CliResult<()> {
    let instance_id = replay(manager, template_id, completed)?;
    let snapshot = manager.get_progress(&instance_id)?;

    match format {
        OutputFormat::Json => output::print_single(&snapshot),
        OutputFormat::Table => print_snapshot(&snapshot),
    }
}

/// Report one step's status after applying `completed` in order
pub fn status(
    manager: &InstanceManager,
    template_id: &str,
    step_id: &str,
    completed: &[String],
    format: OutputFormat,
) -> CliResult<()> {
    let instance_id = replay(manager, template_id, completed)?;
    let status = manager.step_status(&instance_id, &StepId::new(step_id))?;

    match format {
        OutputFormat::Json => output::print_single(&StatusReport {
            template_id,
            step_id,
            status,
        }),
        OutputFormat::Table => {
            println!("{}: {}", step_id, paint(status));
            Ok(())
        }
    }
}

fn replay(
    manager: &InstanceManager,
    template_id: &str,
    completed: &[String],
) -> CliResult<WorkflowInstanceId> {
    let instance_id = manager.start(&WorkflowTemplateId::new(template_id))?;
    for step in completed {
        let step = step.trim();
        if step.is_empty() {
            return Err(CliError::InvalidInput("empty step id in --completed".into()));
        }
        manager.mark_step_complete(&instance_id, &StepId::new(step))?;
    }
    Ok(instance_id)
}

fn print_snapshot(snapshot: &ProgressSnapshot) -> CliResult<()> {
    println!(
        "{} {}% ({}/{} steps, ~{} min remaining)",
        snapshot.template_id.to_string().bold(),
        snapshot.completion_percentage,
        snapshot.completed_steps,
        snapshot.total_steps,
        snapshot.estimated_remaining_minutes
    );

    let rows: Vec<StatusRow> = snapshot.steps.iter().map(StatusRow::from).collect();
    output::print_output(rows, OutputFormat::Table)?;

    if snapshot.is_complete {
        print_info("All steps complete");
    }
    for next in &snapshot.next_actionable_steps {
        match &next.action {
            Some(action) => print_info(&format!("Next: {} (run {})", next.id, action.cyan())),
            None => print_info(&format!("Next: {}", next.id)),
        }
    }
    Ok(())
}

fn paint(status: StepStatus) -> ColoredString {
    match status {
        StepStatus::Completed => status.as_str().green(),
        StepStatus::Active => status.as_str().cyan(),
        StepStatus::Blocked => status.as_str().yellow(),
        StepStatus::Pending => status.as_str().dimmed(),
    }
}
