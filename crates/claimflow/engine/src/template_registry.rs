//! Template registry: holds the catalog of workflow templates
//!
//! Templates are validated on the way in and are immutable afterwards.
//! There is no update or remove; a changed template is a redeploy. The
//! registry is populated first and then shared read-only (wrap it in an
//! `Arc`), so readers never need a lock.

use crate::catalog;
use crate::config::EngineConfig;
use crate::graph_validator::validate_template;
use claimflow_types::{WorkflowError, WorkflowResult, WorkflowTemplate, WorkflowTemplateId};
use std::collections::HashMap;

/// Registry of workflow templates
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<WorkflowTemplateId, WorkflowTemplate>,
}

/// Outcome of loading a catalog into a registry
#[derive(Debug, Default)]
pub struct CatalogLoadReport {
    /// Templates registered, in load order
    pub registered: Vec<WorkflowTemplateId>,
    /// Templates rejected, with the reason
    pub rejected: Vec<(WorkflowTemplateId, WorkflowError)>,
}

impl CatalogLoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in catalog
    pub fn with_builtin_catalog() -> WorkflowResult<Self> {
        let mut registry = Self::new();
        for template in catalog::builtin_templates() {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Build a registry from configuration.
    ///
    /// A template that fails to register is logged and reported but does not
    /// stop the others. A catalog file that cannot be read or parsed is an
    /// error.
    pub fn from_config(config: &EngineConfig) -> WorkflowResult<(Self, CatalogLoadReport)> {
        let mut registry = Self::new();
        let mut report = CatalogLoadReport::default();

        if config.include_builtin_catalog {
            registry.register_all(catalog::builtin_templates(), &mut report);
        }
        for path in &config.catalog_paths {
            let templates = catalog::load_catalog_file(path)?;
            registry.register_all(templates, &mut report);
        }

        tracing::info!(
            registered = report.registered.len(),
            rejected = report.rejected.len(),
            "Template catalog loaded"
        );
        Ok((registry, report))
    }

    /// Register every template, recording each outcome
    pub fn register_all(
        &mut self,
        templates: impl IntoIterator<Item = WorkflowTemplate>,
        report: &mut CatalogLoadReport,
    ) {
        for template in templates {
            let id = template.id.clone();
            match self.register(template) {
                Ok(id) => report.registered.push(id),
                Err(err) => report.rejected.push((id, err)),
            }
        }
    }

    /// Register a template.
    ///
    /// Validates the step graph before storing; a template that fails is
    /// rejected wholesale and never becomes retrievable.
    pub fn register(&mut self, template: WorkflowTemplate) -> WorkflowResult<WorkflowTemplateId> {
        let id = template.id.clone();

        if let Err(reason) = validate_template(&template) {
            tracing::warn!(template_id = %id, error = %reason, "Workflow template rejected");
            return Err(WorkflowError::InvalidTemplate {
                template_id: id,
                reason,
            });
        }
        if self.templates.contains_key(&id) {
            tracing::warn!(template_id = %id, "Workflow template already registered");
            return Err(WorkflowError::TemplateAlreadyRegistered(id));
        }

        tracing::info!(
            template_id = %id,
            steps = template.step_count(),
            "Workflow template registered"
        );
        self.templates.insert(id.clone(), template);
        Ok(id)
    }

    /// Get a template by ID
    pub fn get(&self, id: &WorkflowTemplateId) -> WorkflowResult<&WorkflowTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| WorkflowError::TemplateNotFound(id.clone()))
    }

    /// Check if a template exists
    pub fn contains(&self, id: &WorkflowTemplateId) -> bool {
        self.templates.contains_key(id)
    }

    /// All templates, sorted by ID
    pub fn list(&self) -> Vec<&WorkflowTemplate> {
        let mut templates: Vec<_> = self.templates.values().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Total number of registered templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}
