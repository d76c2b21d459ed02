mod common;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use minipl::parser::Parser;
use minipl::scanner::Scanner;
use minipl::token::TokenKind;

fn bench_frontend(c: &mut Criterion) {
    for (label, path) in common::WORKLOADS {
        let source = common::load_source(path);

        c.bench_function(&format!("frontend_scan_{label}"), |b| {
            b.iter(|| {
                let mut scanner = Scanner::new(black_box(&source));
                loop {
                    let token = scanner.scan_next_token();
                    if token.kind == TokenKind::Eof {
                        break;
                    }
                    black_box(token);
                }
            })
        });

        c.bench_function(&format!("frontend_scan_parse_{label}"), |b| {
            b.iter(|| {
                let mut parser = Parser::new(Scanner::new(black_box(&source)));
                let program = parser.parse_program();
                assert!(!parser.errors_detected());
                black_box(program);
            })
        });
    }
}

criterion_group!(benches, bench_frontend);
criterion_main!(benches);
