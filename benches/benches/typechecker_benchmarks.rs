//! Type Checker Performance Benchmarks
//!
//! This module benchmarks the Tuplet type checker:
//! - Throughput on programs of tuple-returning procedures
//! - Environment depth from nested let-values
//! - Wide tuples

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tuplet_benchmarks::{generate_nested_let_values, generate_tuple_procedures, generate_wide_tuple};
use tuplet_types::TypeChecker;

// ============================================================================
// Type Checker Benchmarks
// ============================================================================

fn bench_typechecker_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("typechecker_throughput");

    for count in [10, 50, 200] {
        let source = generate_tuple_procedures(count);
        // Pre-parse (we want to measure type checking, not parsing)
        let Ok(program) = tuplet_parser::parse_program(&source) else {
            continue;
        };

        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("check_program", count),
            &program,
            |b, program| {
                let checker = TypeChecker::new();
                b.iter(|| black_box(checker.check_program(black_box(program))))
            },
        );
    }

    group.finish();
}

fn bench_typechecker_stress(c: &mut Criterion) {
    let mut group = c.benchmark_group("typechecker_stress");

    // Every level adds a frame the lookups of `x` and `y` must pass
    for depth in [10, 100, 500] {
        let source = generate_nested_let_values(depth);
        if let Ok(program) = tuplet_parser::parse_program(&source) {
            group.bench_with_input(
                BenchmarkId::new("nested_let_values", depth),
                &program,
                |b, program| {
                    let checker = TypeChecker::new();
                    b.iter(|| black_box(checker.check_program(black_box(program))))
                },
            );
        }
    }

    for width in [4, 64, 512] {
        let source = generate_wide_tuple(width);
        if let Ok(program) = tuplet_parser::parse_program(&source) {
            group.bench_with_input(
                BenchmarkId::new("wide_tuple", width),
                &program,
                |b, program| {
                    let checker = TypeChecker::new();
                    b.iter(|| black_box(checker.check_program(black_box(program))))
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Parse + Check
// ============================================================================

fn bench_parse_and_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_check");

    let source = generate_tuple_procedures(50);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("tuple_procedures_50", |b| {
        b.iter(|| {
            let program = tuplet_parser::parse_program(black_box(&source));
            black_box(program.map(|p| TypeChecker::new().check_program(&p)))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_typechecker_throughput,
    bench_typechecker_stress,
    bench_parse_and_check,
);
criterion_main!(benches);
