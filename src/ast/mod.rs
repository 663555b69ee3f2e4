/// Syntax tree module
/// Contains the tree every pass walks
///
/// Submodules:
/// - ast: `Node` and the closed set of `NodeKind`s
/// - types: Built-in type and built-in function names
pub mod ast;
pub mod types;

#[cfg(test)]
mod tests;
