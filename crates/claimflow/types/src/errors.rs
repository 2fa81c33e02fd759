//! Error types for the workflow engine

use crate::{StepId, WorkflowInstanceId, WorkflowTemplateId};

/// Why a template failed structural validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateValidationError {
    #[error("Duplicate step ID: {step_id}")]
    DuplicateStepId { step_id: StepId },

    #[error("Step '{step_id}' depends on unknown step '{dependency}'")]
    UnknownDependency { step_id: StepId, dependency: StepId },

    #[error("Cyclic dependency: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<StepId> },
}

fn format_cycle(cycle: &[StepId]) -> String {
    let mut ids: Vec<&str> = cycle.iter().map(|s| s.as_str()).collect();
    if let Some(first) = cycle.first() {
        ids.push(first.as_str());
    }
    ids.join(" -> ")
}

/// Errors that can occur in workflow operations
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid template '{template_id}': {reason}")]
    InvalidTemplate {
        template_id: WorkflowTemplateId,
        #[source]
        reason: TemplateValidationError,
    },

    #[error("Template already registered: {0}")]
    TemplateAlreadyRegistered(WorkflowTemplateId),

    #[error("Template not found: {0}")]
    TemplateNotFound(WorkflowTemplateId),

    #[error("Workflow instance not found: {0}")]
    InstanceNotFound(WorkflowInstanceId),

    #[error("Unknown step '{step_id}' in template '{template_id}'")]
    UnknownStep {
        template_id: WorkflowTemplateId,
        step_id: StepId,
    },

    #[error("Workflow instance superseded: {0}")]
    InstanceSuperseded(WorkflowInstanceId),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WorkflowError {
    /// Lookup failures against caller-supplied IDs
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound(_) | Self::InstanceNotFound(_) | Self::UnknownStep { .. }
        )
    }

    /// The validation failure behind an `InvalidTemplate`, if any
    pub fn validation_reason(&self) -> Option<&TemplateValidationError> {
        match self {
            Self::InvalidTemplate { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
