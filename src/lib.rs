//! Front-end compiler pipeline for the French-language algorithmics pseudocode
//! notation ("Algorithme ... Debut ... Fin"): lexer, parser, AST and semantic
//! analyzer, plus the three target-language emitters (C, Java, Python) that
//! walk the resolved tree. See `src/main.rs` for the CLI driver built on top
//! of this library.

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod emit;
pub mod lexer;
pub mod parser;
pub mod sem;
