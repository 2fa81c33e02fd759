//! Workflow domain types for claimflow
//!
//! A claims-processing workflow (claim submission, denial appeal,
//! pre-visit eligibility, remittance processing) is modelled as a
//! directed dependency graph of steps.
//!
//! # Key Concepts
//!
//! - **WorkflowTemplate**: an immutable, named graph of steps.
//! - **WorkflowStep**: one unit of work; may name an external action.
//! - **WorkflowInstance**: one execution of a template, tracked only by
//!   its set of completed step IDs.
//! - **ProgressSnapshot**: what can run next, what is blocked and how far
//!   along an instance is, derived from the completed set.
//!
//! Templates coordinate, they never execute. The business action behind a
//! step is invoked by the caller; its result comes back as a completion.

#![deny(unsafe_code)]

mod errors;
mod instance;
mod progress;
mod step;
mod template;

pub use errors::*;
pub use instance::*;
pub use progress::*;
pub use step::*;
pub use template::*;
