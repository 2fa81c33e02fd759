//! Workflow progression engine for claimflow
//!
//! The engine models a multi-step business process as a dependency graph
//! of steps and computes, purely from the set of completed steps, what can
//! run next, what is blocked and how far along the process is.
//!
//! # Key Principle
//!
//! **The engine reports, it NEVER executes actions.**
//!
//! A step may name an external operation (`checkEligibility`,
//! `submitClaim`, ...). The caller runs it when the step is reported
//! active and feeds the outcome back as a completion event.
//!
//! # Architecture
//!
//! - [`TemplateRegistry`]: Validates and stores workflow templates
//! - [`graph_validator`]: Uniqueness, referential integrity and cycle checks
//! - [`ProgressEvaluator`]: Pure status, frontier and percentage derivation
//! - [`InstanceManager`]: Starts instances and applies completion events
//! - [`catalog`]: The built-in templates and TOML catalog files
//!
//! # Example
//!
//! ```rust
//! use claimflow_engine::{catalog, InstanceManager, TemplateRegistry};
//! use claimflow_types::{StepId, StepStatus, WorkflowTemplateId};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TemplateRegistry::with_builtin_catalog().unwrap());
//! let manager = InstanceManager::new(registry);
//!
//! let id = manager
//!     .start(&WorkflowTemplateId::new(catalog::NEW_CLAIM_SUBMISSION))
//!     .unwrap();
//!
//! manager.mark_step_complete(&id, &StepId::new("data-input")).unwrap();
//! let progress = manager
//!     .mark_step_complete(&id, &StepId::new("ai-coding"))
//!     .unwrap();
//!
//! assert_eq!(progress.completion_percentage, 33);
//! assert_eq!(
//!     progress.status_of(&StepId::new("claim-submission")),
//!     StepStatus::Blocked
//! );
//! ```

#![deny(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod graph_validator;
pub mod instance_manager;
pub mod progress_evaluator;
pub mod template_registry;

// Re-export main types
pub use config::EngineConfig;
pub use instance_manager::InstanceManager;
pub use progress_evaluator::ProgressEvaluator;
pub use template_registry::{CatalogLoadReport, TemplateRegistry};
