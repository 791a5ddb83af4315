use criterion::{Criterion, criterion_group, criterion_main};
use smpl::parser::{Tokenizer, parse};
use smpl::printer::Printer;
use std::hint::black_box;

const EXPRESSIONS: &[&str] = &[
    "2 + 3",
    "-x * (y - 4) / 2",
    "a not b and c >= 10 or d",
    "if n % 2 = 0 then n / 2 else 3 * n + 1",
    "2 ^ 3 ^ 2 - -(1.5 * r)",
];

fn benchmark_tokenizer_only(c: &mut Criterion) {
    let expression = EXPRESSIONS[3];

    c.bench_function("tokenizer_only", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::new(black_box(expression));
            let mut token_count = 0;
            while let Ok(Some(_)) = tokenizer.next_token() {
                token_count += 1;
            }
            black_box(token_count)
        })
    });
}

fn benchmark_multiple_expressions(c: &mut Criterion) {
    for (i, expression) in EXPRESSIONS.iter().enumerate() {
        c.bench_function(&format!("expr_{i}_parser"), |b| {
            b.iter(|| black_box(parse(black_box(expression))))
        });
    }
}

fn benchmark_round_trip(c: &mut Criterion) {
    let Ok(tree) = parse(EXPRESSIONS[4]) else {
        return;
    };

    c.bench_function("print_and_reparse", |b| {
        b.iter(|| {
            let text = Printer::print(black_box(&tree));
            black_box(parse(&text))
        })
    });
}

criterion_group!(
    benches,
    benchmark_tokenizer_only,
    benchmark_multiple_expressions,
    benchmark_round_trip
);
criterion_main!(benches);
