//! Pass 3: type checking.
//!
//! Every expression gets an end type (see `end_type`); the checker compares
//! end types wherever two of them meet:
//!
//! - declarations and assignments
//! - operator operands and conditions
//! - array sizes and initializer elements
//! - call arguments against parameters
//! - returns against the declared return type
//!
//! Like the earlier passes it reports and keeps going.

pub mod end_type;
pub mod type_checker;

#[cfg(test)]
mod tests;
