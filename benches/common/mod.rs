#![allow(dead_code)]
use std::fs;

use minipl::ast::Program;
use minipl::parser::Parser;
use minipl::scanner::Scanner;

pub const WORKLOADS: [(&str, &str); 2] = [
    ("nested_loops", "tests/programs/nested_loops/program.mpl"),
    ("arithmetic_series", "tests/programs/arithmetic_series/program.mpl"),
];

pub fn load_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
}

pub fn load_program(path: &str) -> Program {
    let source = load_source(path);
    let mut parser = Parser::new(Scanner::new(&source));
    let program = parser.parse_program();
    assert!(
        !parser.errors_detected(),
        "parse {path}: {:?}",
        parser.diagnostics()
    );
    program
}
