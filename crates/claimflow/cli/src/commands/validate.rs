//! Catalog file validation

use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, OutputFormat};
use claimflow_engine::{catalog, CatalogLoadReport, TemplateRegistry};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Table row for one template's validation outcome
#[derive(Debug, Serialize, Tabled)]
struct ValidationRow {
    template: String,
    valid: bool,
    detail: String,
}

/// Validate every template in a catalog file
///
/// Templates are checked in isolation from the built-in catalog, so an
/// id that shadows a built-in one is not reported as a duplicate.
pub fn validate(file: &Path, format: OutputFormat) -> CliResult<()> {
    let templates = catalog::load_catalog_file(file)?;
    let total = templates.len();

    let mut registry = TemplateRegistry::new();
    let mut report = CatalogLoadReport::default();
    registry.register_all(templates, &mut report);

    let mut rows: Vec<ValidationRow> = report
        .registered
        .iter()
        .map(|id| ValidationRow {
            template: id.to_string(),
            valid: true,
            detail: "ok".into(),
        })
        .collect();
    rows.extend(report.rejected.iter().map(|(id, err)| ValidationRow {
        template: id.to_string(),
        valid: false,
        detail: err
            .validation_reason()
            .map(|reason| reason.to_string())
            .unwrap_or_else(|| err.to_string()),
    }));
    output::print_output(rows, format)?;

    if report.is_clean() {
        if format == OutputFormat::Table {
            print_success(&format!("{} template(s) valid", total));
        }
        Ok(())
    } else {
        Err(CliError::Validation {
            rejected: report.rejected.len(),
        })
    }
}
