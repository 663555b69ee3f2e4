//! Symbols and the scope graph.
//!
//! This module holds everything the analysis passes know about names:
//!
//! - `Symbol`: a named, typed entity (built-in, variable, function, class, array, reference)
//! - `ScopeTree`: an arena of nested scopes mirroring program, class, function and block nesting
//!
//! Scopes and symbols are addressed by index (`ScopeId`, `SymbolId`), so tree
//! nodes, superclass links and reference origins never own what they point at.

pub mod scope;
pub mod symbol;

#[cfg(test)]
mod tests;
