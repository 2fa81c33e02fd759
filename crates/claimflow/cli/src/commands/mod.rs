//! CLI command implementations

pub mod progress;
pub mod template;
pub mod validate;
