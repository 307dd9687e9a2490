use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stringdecimal::{evaluate, EvalOptions};

fn bench_evaluate(c: &mut Criterion) {
    let opts = EvalOptions::default();

    c.bench_function("evaluate arithmetic chain", |b| {
        b.iter(|| evaluate(black_box("1 + 2 * 3 - 4 / 5"), &opts))
    });

    c.bench_function("evaluate nested parens", |b| {
        b.iter(|| evaluate(black_box("((1 + 2) * (3 + 4)) / (5 - 2)"), &opts))
    });

    c.bench_function("evaluate ternary and comparisons", |b| {
        b.iter(|| evaluate(black_box("1 < 2 && 3 >= 3 ? 10 : 20"), &opts))
    });

    c.bench_function("evaluate large power", |b| {
        b.iter(|| evaluate(black_box("2^64"), &opts))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
