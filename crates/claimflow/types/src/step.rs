//! Workflow steps: the units of work inside a template
//!
//! A step never runs anything itself. When it names an `action`, the caller
//! invokes that external operation once the step is reported actionable and
//! feeds the result back as a completion event.

use serde::{Deserialize, Serialize};

// ── Identifier ───────────────────────────────────────────────────────

/// Identifier of a step, unique within its template
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepId(pub String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ── Workflow Step ────────────────────────────────────────────────────

/// Immutable definition of one step in a workflow template
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Unique within the owning template
    pub id: StepId,
    /// Short display title
    pub title: String,
    /// What the step covers
    #[serde(default)]
    pub description: String,
    /// Display icon name
    #[serde(default)]
    pub icon: String,
    /// Name of the external operation this step stands for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Advisory only; never consulted when gating steps
    #[serde(default = "default_required")]
    pub required: bool,
    /// Estimated duration in minutes
    #[serde(default)]
    pub estimated_time: u32,
    /// Steps that must be complete before this one becomes actionable
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_dependencies"
    )]
    pub dependencies: Vec<StepId>,
}

fn default_required() -> bool {
    true
}

/// Dependencies are an ordered set: keep the first occurrence of each ID
fn deserialize_dependencies<'de, D>(deserializer: D) -> Result<Vec<StepId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<StepId>::deserialize(deserializer)?;
    let mut dependencies = Vec::with_capacity(raw.len());
    for id in raw {
        if !dependencies.contains(&id) {
            dependencies.push(id);
        }
    }
    Ok(dependencies)
}

impl WorkflowStep {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: StepId::new(id),
            title: title.into(),
            description: String::new(),
            icon: String::new(),
            action: None,
            required: true,
            estimated_time: 0,
            dependencies: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_time = minutes;
        self
    }

    /// Mark the step as not required (display only)
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Add a dependency. Dependencies form an ordered set, so repeats are dropped.
    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        let id = StepId::new(step_id);
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
        self
    }

    /// Whether this step can be actionable without anything completed
    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let step = WorkflowStep::new("ai-coding", "AI Coding")
            .with_description("Suggest CPT and ICD-10 codes")
            .with_icon("cpu")
            .with_action("generateAICodes")
            .with_estimated_time(3)
            .depends_on("data-input");

        assert_eq!(step.id, StepId::new("ai-coding"));
        assert_eq!(step.action.as_deref(), Some("generateAICodes"));
        assert_eq!(step.estimated_time, 3);
        assert!(step.required);
        assert!(!step.is_root());
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let step = WorkflowStep::new("b", "B").depends_on("a").depends_on("a");
        assert_eq!(step.dependencies, vec![StepId::new("a")]);
    }

    #[test]
    fn test_deserialized_dependencies_are_deduplicated() {
        let step: WorkflowStep = serde_json::from_str(
            r#"{"id":"claim-submission","title":"Submit","dependencies":["code-review","eligibility-check","code-review"]}"#,
        )
        .unwrap();
        assert_eq!(
            step.dependencies,
            vec![StepId::new("code-review"), StepId::new("eligibility-check")]
        );
    }

    #[test]
    fn test_optional() {
        let step = WorkflowStep::new("notes", "Notes").optional();
        assert!(!step.required);
        assert!(step.is_root());
    }

    #[test]
    fn test_deserialize_defaults() {
        let step: WorkflowStep =
            serde_json::from_str(r#"{"id":"data-input","title":"Data Input"}"#).unwrap();
        assert!(step.required);
        assert!(step.action.is_none());
        assert!(step.dependencies.is_empty());
        assert_eq!(format!("{}", step.id), "data-input");
    }
}
