//! The four-pass pipeline.
//!
//! - `parse_source`: front end, source text to syntax tree
//! - `run`: build scopes, resolve references, type check, evaluate
//! - `run_source`: both of the above
//!
//! Every pass writes to one `Output`, so diagnostics and program output
//! interleave in traversal order.

use std::rc::Rc;

use crate::{
    ast::ast::Node,
    errors::errors::Error,
    interpreter::interpreter::evaluate,
    lexer::lexer::tokenize,
    output::Output,
    parser::parser::parse,
    resolver::resolver::resolve_references,
    scope_builder::scope_builder::build_scopes,
    type_checker::type_checker::type_check,
};

#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Print every output line to stdout as it is produced.
    pub echo: bool,
    /// Run the evaluator after the three analysis passes.
    pub evaluate: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            echo: false,
            evaluate: true,
        }
    }
}

pub fn parse_source(source: &str, file: &str) -> Result<Node, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    parse(tokens, Rc::new(file.to_string()))
}

/// Runs every pass over `program`.
///
/// The analysis passes never stop the pipeline; a fatal evaluator error
/// becomes the last line of the output.
///
/// # Arguments
///
/// * `program` - Parsed program; pass 1 adds synthesized special members to it
/// * `options` - Whether output is echoed and whether the evaluator runs
///
/// # Returns
///
/// The diagnostics and program output, in the order they were produced.
pub fn run(program: &mut Node, options: &Options) -> Output {
    let mut out = Output::new(options.echo);

    let tree = build_scopes(program, &mut out);
    resolve_references(program, &tree, &mut out);
    type_check(program, &tree, &mut out);

    if options.evaluate {
        if let Err(error) = evaluate(program, &mut out) {
            tracing::debug!(error = error.get_error_name(), "evaluation aborted");
            out.report(&error);
        }
    }

    out
}

/// Parses `source` and runs every pass over it.
///
/// # Arguments
///
/// * `source` - Program text
/// * `file` - Name used in error positions
/// * `options` - Passed through to `run`
///
/// # Returns
///
/// Returns Ok(Output) once the passes ran, or the syntax error that stopped the parse.
pub fn run_source(source: &str, file: &str, options: &Options) -> Result<Output, Error> {
    let mut program = parse_source(source, file)?;
    Ok(run(&mut program, options))
}
