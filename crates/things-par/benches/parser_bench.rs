//! Parser throughput benchmark.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use things_lex::Lexer;
use things_par::Parser;

const SAMPLE: &str = r#"
var total = 0
i := 0
while i < 100 {
    i += 1
    if i % 3 == 0 { total += i } else { total -= 1 }
}
adder := func(x) { func(y) { x + y } }
pairs := {"a": 1, "b": 2, 3: [1, 2, 3].push(4)}
do { total += pairs["a"] } while total < 1000
"#;

fn bench_parser(c: &mut Criterion) {
    let source = SAMPLE.repeat(16);
    c.bench_function("parse_sample", |b| {
        b.iter(|| {
            let mut parser = Parser::new(Lexer::new(black_box(&source)));
            let program = parser.parse_program();
            assert!(parser.errors().is_empty());
            program.statements.len()
        })
    });
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
