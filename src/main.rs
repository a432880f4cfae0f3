//! # algopc
//!
//! Driver binary: reads a pseudocode source file, runs it through the lexer,
//! parser and semantic analyzer, prints every stage's output, and — if no
//! stage reported a diagnostic — prompts for a target language and emits it.
//! See `SPEC_FULL.md` section 6 for the exit-code contract this implements.

use std::io::{self, Write};
use std::process::ExitCode;
use std::{fs, path::Path};

use log::{error, info};

use algopc::cli::Cli;
use algopc::diagnostics::report;
use algopc::{emit, lexer, parser, sem};

fn main() -> ExitCode {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    run(&args.file)
}

fn run(path: &Path) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            error!("cannot open {}: {err}", path.display());
            return ExitCode::from(1);
        }
    };

    info!("lexing {}", path.display());
    let (tokens, lex_diagnostics) = lexer::lex(&source);
    println!("=== Tokens ({}) ===", tokens.len());
    for token in &tokens {
        println!("{token}");
    }
    report("Lexical errors", &lex_diagnostics);
    if !lex_diagnostics.is_empty() {
        return ExitCode::from(2);
    }

    info!("parsing");
    let (program, parse_diagnostics) = parser::parse(tokens);
    println!("=== AST ===\n{program:#?}");
    report("Syntactic errors", &parse_diagnostics);
    if !parse_diagnostics.is_empty() {
        return ExitCode::from(3);
    }

    info!("analyzing");
    let analysis = sem::analyze(&program);
    report("Semantic errors", &analysis.diagnostics);
    if !analysis.diagnostics.is_empty() {
        return ExitCode::from(4);
    }

    let target = match prompt_target() {
        Some(target) => target,
        None => {
            error!("invalid target language selection");
            return ExitCode::from(1);
        }
    };

    let emitted = match target {
        Target::C => emit::c::emit(&program, &analysis),
        Target::Java => emit::java::emit(&program, &analysis),
        Target::Python => emit::python::emit(&program, &analysis),
    };

    let (out_name, source) = match emitted {
        Ok(source) => (target.file_name(), source),
        Err(diagnostic) => {
            report("Emission errors", std::slice::from_ref(&diagnostic));
            return ExitCode::from(5);
        }
    };

    if let Err(err) = fs::write(out_name, source) {
        error!("cannot write {out_name}: {err}");
        return ExitCode::from(5);
    }

    info!("wrote {out_name}");
    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum Target {
    C,
    Java,
    Python,
}

impl Target {
    fn file_name(self) -> &'static str {
        match self {
            Target::C => "out.c",
            Target::Java => "Main.java",
            Target::Python => "out.py",
        }
    }
}

/// Prompts standard input for `1`/`2`/`3` (C/Java/Python). Any other input
/// aborts generation, per the external-interface contract.
fn prompt_target() -> Option<Target> {
    print!("Target language (1 = C, 2 = Java, 3 = Python): ");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line).ok()?;

    match line.trim() {
        "1" => Some(Target::C),
        "2" => Some(Target::Java),
        "3" => Some(Target::Python),
        _ => None,
    }
}
