//! Template catalog: the built-in workflow templates and catalog files
//!
//! The catalog is a deployment artifact. Built-in templates ship with the
//! binary; extra templates come from TOML files listed in the engine
//! configuration and are loaded once at startup.
//!
//! ```toml
//! [[templates]]
//! id = "prior-auth"
//! name = "Prior Authorization"
//!
//! [[templates.steps]]
//! id = "request"
//! title = "Submit Request"
//! estimated_time = 5
//!
//! [[templates.steps]]
//! id = "decision"
//! title = "Payer Decision"
//! dependencies = ["request"]
//! ```

use claimflow_types::{WorkflowError, WorkflowResult, WorkflowStep, WorkflowTemplate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const NEW_CLAIM_SUBMISSION: &str = "new-claim-submission";
pub const DENIAL_MANAGEMENT: &str = "denial-management";
pub const PRE_ENCOUNTER_ELIGIBILITY: &str = "pre-encounter-eligibility";
pub const ERA_PROCESSING: &str = "era-processing";

/// On-disk shape of a catalog file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub templates: Vec<WorkflowTemplate>,
}

/// The four templates deployed with the engine
pub fn builtin_templates() -> Vec<WorkflowTemplate> {
    vec![
        new_claim_submission(),
        denial_management(),
        pre_encounter_eligibility(),
        era_processing(),
    ]
}

/// Parse a catalog document
pub fn parse_catalog(contents: &str) -> WorkflowResult<Vec<WorkflowTemplate>> {
    let file: CatalogFile =
        toml::from_str(contents).map_err(|e| WorkflowError::Catalog(e.to_string()))?;
    Ok(file.templates)
}

/// Read and parse a catalog file
pub fn load_catalog_file(path: impl AsRef<Path>) -> WorkflowResult<Vec<WorkflowTemplate>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| WorkflowError::Catalog(format!("{}: {}", path.display(), e)))?;
    let templates = parse_catalog(&contents)
        .map_err(|e| WorkflowError::Catalog(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), templates = templates.len(), "Catalog file parsed");
    Ok(templates)
}

// ── Built-in templates ───────────────────────────────────────────────

/// Intake through payer submission for a new encounter
pub fn new_claim_submission() -> WorkflowTemplate {
    WorkflowTemplate::new(NEW_CLAIM_SUBMISSION, "New Claim Submission")
        .with_description("Capture encounter data, code it, verify coverage and submit the claim")
        .with_step(
            WorkflowStep::new("data-input", "Patient & Encounter Data")
                .with_description("Enter patient demographics, insurance and clinical notes")
                .with_icon("file-text")
                .with_estimated_time(5),
        )
        .with_step(
            WorkflowStep::new("eligibility-check", "Eligibility Verification")
                .with_description("Verify active coverage and benefits with the payer")
                .with_icon("shield-check")
                .with_action("checkEligibility")
                .with_estimated_time(2)
                .depends_on("data-input"),
        )
        .with_step(
            WorkflowStep::new("ai-coding", "AI Medical Coding")
                .with_description("Suggest CPT and ICD-10 codes from the clinical notes")
                .with_icon("cpu")
                .with_action("generateAICodes")
                .with_estimated_time(3)
                .depends_on("data-input"),
        )
        .with_step(
            WorkflowStep::new("code-review", "Code Review")
                .with_description("Review and confirm the suggested codes")
                .with_icon("eye")
                .with_estimated_time(5)
                .depends_on("ai-coding"),
        )
        .with_step(
            WorkflowStep::new("cost-estimation", "Patient Cost Estimate")
                .with_description("Estimate the patient's out-of-pocket responsibility")
                .with_icon("calculator")
                .with_action("estimatePatientCost")
                .with_estimated_time(2)
                .optional()
                .depends_on("eligibility-check")
                .depends_on("code-review"),
        )
        .with_step(
            WorkflowStep::new("claim-submission", "Submit Claim")
                .with_description("Generate the 837P claim and submit it to the clearinghouse")
                .with_icon("send")
                .with_action("submitClaim")
                .with_estimated_time(2)
                .depends_on("eligibility-check")
                .depends_on("code-review"),
        )
}

/// Classify a denial and work an appeal through to resubmission
pub fn denial_management() -> WorkflowTemplate {
    WorkflowTemplate::new(DENIAL_MANAGEMENT, "Denial Management")
        .with_description("Classify a denied claim, build an appeal and resubmit")
        .with_step(
            WorkflowStep::new("denial-intake", "Denial Intake")
                .with_description("Record the denial reason codes and payer remarks")
                .with_icon("inbox")
                .with_estimated_time(3),
        )
        .with_step(
            WorkflowStep::new("denial-classification", "Classify Denial")
                .with_description("Categorize the denial and judge whether it is appealable")
                .with_icon("tags")
                .with_action("classifyDenial")
                .with_estimated_time(2)
                .depends_on("denial-intake"),
        )
        .with_step(
            WorkflowStep::new("documentation-review", "Gather Documentation")
                .with_description("Collect the records needed to support the appeal")
                .with_icon("folder-open")
                .with_estimated_time(15)
                .depends_on("denial-classification"),
        )
        .with_step(
            WorkflowStep::new("appeal-generation", "Generate Appeal Letter")
                .with_description("Draft the appeal letter from the denial and the supporting records")
                .with_icon("file-pen")
                .with_action("generateAppeal")
                .with_estimated_time(5)
                .depends_on("denial-classification")
                .depends_on("documentation-review"),
        )
        .with_step(
            WorkflowStep::new("appeal-submission", "Submit Appeal")
                .with_description("Send the appeal and corrected claim to the payer")
                .with_icon("send")
                .with_action("submitClaim")
                .with_estimated_time(2)
                .depends_on("appeal-generation"),
        )
}

/// Verify coverage and estimate cost before the patient arrives
pub fn pre_encounter_eligibility() -> WorkflowTemplate {
    WorkflowTemplate::new(PRE_ENCOUNTER_ELIGIBILITY, "Pre-Encounter Eligibility")
        .with_description("Check coverage for scheduled patients and prepare cost estimates")
        .with_step(
            WorkflowStep::new("schedule-import", "Import Schedule")
                .with_description("Load upcoming appointments")
                .with_icon("calendar")
                .with_estimated_time(2),
        )
        .with_step(
            WorkflowStep::new("batch-eligibility", "Batch Eligibility Check")
                .with_description("Run 270/271 eligibility checks for every scheduled patient")
                .with_icon("shield-check")
                .with_action("batchEligibilityCheck")
                .with_estimated_time(5)
                .depends_on("schedule-import"),
        )
        .with_step(
            WorkflowStep::new("coverage-review", "Review Coverage Issues")
                .with_description("Follow up on inactive or ambiguous coverage")
                .with_icon("alert-triangle")
                .with_estimated_time(10)
                .depends_on("batch-eligibility"),
        )
        .with_step(
            WorkflowStep::new("cost-estimates", "Patient Cost Estimates")
                .with_description("Estimate out-of-pocket cost for each visit")
                .with_icon("calculator")
                .with_action("estimatePatientCost")
                .with_estimated_time(5)
                .depends_on("batch-eligibility"),
        )
        .with_step(
            WorkflowStep::new("patient-outreach", "Patient Outreach")
                .with_description("Notify patients of coverage problems and expected cost")
                .with_icon("phone")
                .with_estimated_time(10)
                .optional()
                .depends_on("coverage-review")
                .depends_on("cost-estimates"),
        )
}

/// Post payments from a remittance advice and route any denials
pub fn era_processing() -> WorkflowTemplate {
    WorkflowTemplate::new(ERA_PROCESSING, "ERA Processing")
        .with_description("Parse an electronic remittance advice, post payments and route denials")
        .with_step(
            WorkflowStep::new("era-upload", "Upload ERA")
                .with_description("Receive the 835 remittance file")
                .with_icon("upload")
                .with_estimated_time(1),
        )
        .with_step(
            WorkflowStep::new("era-parsing", "Parse ERA")
                .with_description("Extract claim-level payments and adjustments")
                .with_icon("file-search")
                .with_action("parseERA")
                .with_estimated_time(2)
                .depends_on("era-upload"),
        )
        .with_step(
            WorkflowStep::new("payment-posting", "Post Payments")
                .with_description("Apply paid amounts to the matching claims")
                .with_icon("dollar-sign")
                .with_estimated_time(5)
                .depends_on("era-parsing"),
        )
        .with_step(
            WorkflowStep::new("denial-routing", "Route Denials")
                .with_description("Classify denied lines and queue them for follow-up")
                .with_icon("git-branch")
                .with_action("classifyDenial")
                .with_estimated_time(3)
                .depends_on("era-parsing"),
        )
        .with_step(
            WorkflowStep::new("reconciliation", "Reconcile")
                .with_description("Reconcile the remittance total against the deposit")
                .with_icon("check-circle")
                .with_estimated_time(5)
                .depends_on("payment-posting")
                .depends_on("denial-routing"),
        )
}
