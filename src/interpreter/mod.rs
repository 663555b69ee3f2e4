//! The evaluator.
//!
//! Executes a checked tree against a chain of environments:
//!
//! - interpreter: entry point, calls, construction, copies and destruction
//! - stmt: declarations, blocks and control flow
//! - expr: expressions, places and operators
//! - environment: the runtime scope chain
//! - value: runtime values, arrays, classes, instances and closures
//! - builtins: `print_int`, `print_bool` and `print_char`
//!
//! Lookup failures left over from earlier passes degrade to null. Missing
//! members and division by zero stop evaluation.

pub mod builtins;
pub mod environment;
pub mod expr;
pub mod interpreter;
pub mod stmt;
pub mod value;
