mod common;

use std::io;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use minipl::analyzer::Analyzer;
use minipl::evaluator::Evaluator;

fn bench_interpreter(c: &mut Criterion) {
    for (label, path) in common::WORKLOADS {
        let program = common::load_program(path);
        let mut analyzer = Analyzer::new();
        analyzer.analyze(&program);
        assert!(!analyzer.errors_detected());

        c.bench_function(&format!("interpreter_execute_{label}"), |b| {
            b.iter(|| {
                let mut output = Vec::new();
                let mut evaluator = Evaluator::new(io::empty(), &mut output);
                evaluator.execute(black_box(&program));
                assert!(!evaluator.errors_detected());
                black_box(output);
            })
        });
    }
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
