//! Pass 1: scope construction.
//!
//! This module walks the syntax tree once and produces the `ScopeTree`:
//!
//! - scope_builder: scope creation, declaration binding and declaration checks
//! - synthesis: the special members a class omits
//! - const_eval: folding of constant array sizes
//!
//! Violations are reported on the output stream and the walk continues.

pub mod const_eval;
pub mod scope_builder;
pub mod synthesis;

#[cfg(test)]
mod tests;
