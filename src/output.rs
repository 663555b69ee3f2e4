//! The interleaved output stream shared by every pass.
//!
//! Program output from the built-in print functions and diagnostics from
//! the semantic passes end up on the same stream, in traversal order.
//! Diagnostics are written as `Error: <message>`.

use crate::errors::errors::Error;

pub const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Default, Clone)]
pub struct Output {
    lines: Vec<String>,
    echo: bool,
}

impl Output {
    /// When `echo` is set every line is also printed to stdout as soon as it is produced.
    pub fn new(echo: bool) -> Self {
        Output {
            lines: vec![],
            echo,
        }
    }

    pub fn print(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }

    pub fn report(&mut self, error: &Error) {
        tracing::debug!(error = error.get_error_name(), "diagnostic");
        self.print(format!("{}{}", ERROR_PREFIX, error));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter_map(|line| line.strip_prefix(ERROR_PREFIX))
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
