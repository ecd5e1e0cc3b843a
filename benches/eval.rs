//! Compile, evaluate, and differentiate benchmarks.
//!
//! Expressions are generated with many mixed terms so the evaluator's
//! linear pass dominates over call overhead.

use std::fmt::Write;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use symfun::{differentiate, SymFun};

/// Generate a mixed expression with `n` terms over `x`.
fn generate_mixed(n: usize) -> String {
    let mut s = String::with_capacity(n * 16);
    for i in 1..=n {
        if i > 1 {
            if i % 3 == 0 {
                write!(s, " - ").unwrap();
            } else {
                write!(s, " + ").unwrap();
            }
        }
        match i % 4 {
            0 => write!(s, "sin({}.0*x)", i).unwrap(),
            1 => write!(s, "x^{}", i % 5 + 1).unwrap(),
            2 => write!(s, "{}.0*x", i).unwrap(),
            _ => write!(s, "exp(x/{}.0)", i).unwrap(),
        }
    }
    s
}

fn bench_compile(c: &mut Criterion) {
    let text = generate_mixed(100);
    c.bench_function("compile_100_terms", |b| {
        b.iter(|| SymFun::with_variables(&["x"], black_box(&text)).unwrap());
    });
}

fn bench_eval(c: &mut Criterion) {
    let text = generate_mixed(100);
    let mut f = SymFun::with_variables(&["x"], &text).unwrap();
    c.bench_function("eval_100_terms", |b| {
        b.iter(|| f.eval(black_box(&[0.37])));
    });

    let mut quadratic =
        SymFun::compile(&["x"], &["a", "b", "c"], &[1.0, 2.0, 1.0], "a*x^2+b*x+c").unwrap();
    c.bench_function("eval_quadratic", |b| {
        b.iter(|| quadratic.eval(black_box(&[1.5])));
    });
}

fn bench_differentiate(c: &mut Criterion) {
    let text = generate_mixed(30);
    let f = SymFun::with_variables(&["x"], &text).unwrap();
    c.bench_function("differentiate_30_terms", |b| {
        b.iter(|| differentiate(black_box(&f), "x").unwrap());
    });
}

criterion_group!(benches, bench_compile, bench_eval, bench_differentiate);
criterion_main!(benches);
