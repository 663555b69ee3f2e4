//! Pass 2: reference resolution.
//!
//! This module re-walks the tree once pass 1 has bound every declaration,
//! so uses may refer to names declared later in an enclosing scope. It checks:
//!
//! - variable, function and array names
//! - call arity for functions, built-ins, methods and constructions
//! - member access chains (`a.b.c`, `this->x`, `f().g()`)
//!
//! `resolve_member` is shared with the type checker.

pub mod resolver;
