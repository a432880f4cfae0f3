//! Read-only AST-to-text tree walkers, one per target language (C, Java,
//! Python). Each emitter consumes the already-resolved [`Program`](crate::ast::Program)
//! plus the [`AnalysisResult`](crate::sem::AnalysisResult)'s struct-layout and
//! function-signature tables; none performs validation or type inference of
//! its own — a clean semantic pass is a precondition, not something an
//! emitter checks again.

pub mod c;
pub mod java;
pub mod python;

use crate::ast::{Position, PrimitiveType, TypeExpr};
use crate::diagnostics::Diagnostic;
use crate::sem::Type;

/// Converts surface syntax to the analyzer's resolved descriptor without
/// re-validating anything (the tree has already passed semantic analysis by
/// the time any emitter runs). Shared by all three emitters for the local
/// type bookkeeping each needs to make lowering decisions (format
/// specifiers, default-value synthesis, struct-vs-array dispatch).
pub(crate) fn type_expr_to_type(type_expr: &TypeExpr) -> Type {
    match type_expr {
        TypeExpr::Primitive { kind, .. } => match kind {
            PrimitiveType::Integer => Type::Integer,
            PrimitiveType::Real => Type::Real,
            PrimitiveType::Character => Type::Character,
            PrimitiveType::String => Type::String,
            PrimitiveType::Boolean => Type::Boolean,
        },
        TypeExpr::Named { name, .. } => Type::Struct { name: name.clone() },
        TypeExpr::ArrayOf { element, dimensions, .. } => Type::Array {
            element: Box::new(type_expr_to_type(element)),
            dimensions: dimensions.len(),
        },
    }
}

/// An emission-stage diagnostic. Emitters have no source position of their
/// own to blame (they walk an already-validated tree), so these are always
/// anchored at `0:0`; the message carries the detail.
pub fn emit_error(message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(Position::new(0, 0), message)
}

/// Indentation helper shared by all three emitters: each pushes lines into a
/// `String` buffer at a tracked nesting depth, mirroring the original
/// implementation's `emit_indent`/`emit_ln` pair (see `jgen.c`/`pygen.c`/`cgen.c`).
#[derive(Default)]
pub struct Writer {
    buf: String,
    indent: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.buf.push_str("    ");
        }
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
