//! Template catalog commands

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use claimflow_engine::graph_validator::topological_order;
use claimflow_engine::TemplateRegistry;
use claimflow_types::{WorkflowStep, WorkflowTemplate, WorkflowTemplateId};
use colored::*;
use serde::Serialize;
use tabled::Tabled;

/// Table row for template listing
#[derive(Debug, Serialize, Tabled)]
struct TemplateRow {
    id: String,
    name: String,
    steps: usize,
    #[tabled(rename = "est. minutes")]
    estimated_minutes: u32,
}

impl From<&WorkflowTemplate> for TemplateRow {
    fn from(template: &WorkflowTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.clone(),
            steps: template.step_count(),
            estimated_minutes: template.estimated_total_time(),
        }
    }
}

/// Table row for one step of a template
#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    id: String,
    title: String,
    action: String,
    #[tabled(rename = "depends on")]
    depends_on: String,
    required: bool,
    minutes: u32,
}

impl From<&WorkflowStep> for StepRow {
    fn from(step: &WorkflowStep) -> Self {
        Self {
            id: step.id.to_string(),
            title: step.title.clone(),
            action: step.action.clone().unwrap_or_else(|| "-".into()),
            depends_on: join_or_dash(step.dependencies.iter().map(|d| d.as_str())),
            required: step.required,
            minutes: step.estimated_time,
        }
    }
}

fn join_or_dash<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let joined = ids.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".into()
    } else {
        joined
    }
}

/// List registered templates
pub fn list(registry: &TemplateRegistry, format: OutputFormat) -> CliResult<()> {
    let rows: Vec<TemplateRow> = registry.list().into_iter().map(TemplateRow::from).collect();
    output::print_output(rows, format)
}

/// Show one template's steps
pub fn show(registry: &TemplateRegistry, template_id: &str, format: OutputFormat) -> CliResult<()> {
    let template = registry.get(&WorkflowTemplateId::new(template_id))?;

    match format {
        OutputFormat::Json => output::print_single(template),
        OutputFormat::Table => {
            println!("{} ({})", template.name.bold(), template.id);
            if !template.description.is_empty() {
                println!("{}", template.description.dimmed());
            }
            let rows: Vec<StepRow> = template.steps.iter().map(StepRow::from).collect();
            output::print_output(rows, format)?;

            let order = topological_order(template).map_err(|reason| {
                claimflow_types::WorkflowError::InvalidTemplate {
                    template_id: template.id.clone(),
                    reason,
                }
            })?;
            println!(
                "Execution order: {}",
                order
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(" → ")
            );
            println!("Estimated total: {} min", template.estimated_total_time());
            Ok(())
        }
    }
}
