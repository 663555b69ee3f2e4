//! The print functions every program can call.

use crate::{ast::types::BuiltInFunction, output::Output};

use super::{environment::Env, value::Value};

/// Binds every built-in function in the global environment.
pub fn define_builtins(env: &Env<'_>) {
    for function in BuiltInFunction::ALL {
        env.borrow_mut()
            .define(function.name(), Value::BuiltIn(function));
    }
}

/// Formats `argument` the way `function` prints it, as one output line.
pub fn format_builtin(function: BuiltInFunction, argument: &Value<'_>) -> String {
    match function {
        BuiltInFunction::PrintInt => argument.as_int().to_string(),
        // Booleans print as integers, like a C++ stream without boolalpha
        BuiltInFunction::PrintBool => (argument.as_bool() as i32).to_string(),
        BuiltInFunction::PrintChar => argument.as_char().to_string(),
    }
}

pub fn call_builtin(function: BuiltInFunction, argument: &Value<'_>, out: &mut Output) {
    let line = format_builtin(function, argument);
    tracing::trace!(function = function.name(), %line, "builtin call");
    out.print(line);
}
