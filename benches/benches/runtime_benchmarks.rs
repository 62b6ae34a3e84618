//! Runtime Performance Benchmarks
//!
//! This module benchmarks the Tuplet evaluator on generated programs and
//! a few small algorithms.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tuplet_benchmarks::{generate_nested_let_values, generate_tuple_procedures};
use tuplet_interpreter::Interpreter;

// ============================================================================
// Interpreter Benchmarks
// ============================================================================

fn bench_interpreter_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpreter_execution");

    let programs = [
        ("tuple_procedures", generate_tuple_procedures(50)),
        ("nested_let_values", generate_nested_let_values(100)),
    ];

    for (name, source) in programs.iter() {
        if let Ok(program) = tuplet_parser::parse_program(source) {
            group.bench_with_input(BenchmarkId::from_parameter(name), &program, |b, program| {
                b.iter(|| {
                    let mut interpreter = Interpreter::new();
                    black_box(interpreter.run(black_box(program)))
                })
            });
        }
    }

    group.finish();
}

// ============================================================================
// Specific Algorithm Benchmarks
// ============================================================================

fn bench_interpreter_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpreter_algorithms");

    // Fibonacci pairs threaded through values / let-values
    let fib_pairs = "
        (define (step : (number * number * number -> (number * number)))
          (lambda ((n : number) (a : number) (b : number)) : (number * number)
            (if (= n 0)
                (values a b)
                (step (- n 1) b (+ a b)))))
        (let-values ((((a : number) (b : number)) (step 25 0 1))) a)
    ";

    let factorial = "
        (letrec (((fact : (number -> number))
                  (lambda ((n : number)) : number
                    (if (< n 2) 1 (* n (fact (- n 1)))))))
          (fact 20))
    ";

    for (name, source) in [("fib_pairs", fib_pairs), ("factorial", factorial)] {
        if let Ok(program) = tuplet_parser::parse_program(source) {
            group.bench_with_input(BenchmarkId::from_parameter(name), &program, |b, program| {
                b.iter(|| {
                    let mut interpreter = Interpreter::new();
                    black_box(interpreter.run(black_box(program)))
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_interpreter_execution, bench_interpreter_algorithms);
criterion_main!(benches);
