//! Shared diagnostic type for the four stages of the pipeline (lexical, syntactic,
//! semantic, emission). Every stage accumulates its own `Vec<Diagnostic>` instead
//! of raising an exception; the driver prints and aborts at the first non-empty
//! stream (see `main`).

use std::fmt::{self, Display};

use crate::lexer::Position;

/// A single position-prefixed diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.position.line, self.position.column, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Prints every diagnostic in `diagnostics` under `heading`, one per line.
pub fn report(heading: &str, diagnostics: &[Diagnostic]) {
    println!("=== {heading} ({}) ===", diagnostics.len());
    for diagnostic in diagnostics {
        println!("{diagnostic}");
    }
}
