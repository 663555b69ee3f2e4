//! Error types and error reporting for the interpreter.
//!
//! This module defines the single error type shared by every stage of
//! the pipeline. It includes:
//!
//! - Error structures with optional source position information
//! - Variants for the front end and for each semantic pass
//! - Names and tips used when rendering syntax errors in the CLI
//!
//! Semantic passes never return these errors; they hand them to
//! [`crate::output::Output::report`], which writes `Error: <message>`.

pub mod errors;

#[cfg(test)]
mod tests;
