use std::fs;
use std::io;
use std::process;

use anyhow::{Context, Result, ensure};

use minipl::analyzer::Analyzer;
use minipl::diagnostics::Diagnostic;
use minipl::evaluator::Evaluator;
use minipl::parser::Parser;
use minipl::scanner::Scanner;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("{}", Diagnostic::io(format!("{error:#}")));
            process::exit(-1);
        }
    }
}

fn run() -> Result<i32> {
    let mut args = std::env::args().skip(1);
    let path = args.next().context("missing source file argument")?;
    ensure!(args.next().is_none(), "only one source file is supported");

    let source = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;

    let mut parser = Parser::new(Scanner::new(&source));
    let program = parser.parse_program();
    if parser.errors_detected() {
        report(parser.diagnostics());
        return Ok(-1);
    }

    let mut analyzer = Analyzer::new();
    analyzer.analyze(&program);
    if analyzer.errors_detected() {
        report(analyzer.diagnostics());
        return Ok(-1);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut evaluator = Evaluator::new(stdin.lock(), stdout.lock());
    evaluator.execute(&program);
    if let Some(diagnostic) = evaluator.diagnostic() {
        eprintln!("{diagnostic}");
        return Ok(-1);
    }

    Ok(0)
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}
