//! Integration tests for the Tuplet evaluator.
//!
//! These tests run whole programs from source text through parsing and
//! evaluation, with most of them exercising `values` and `let-values`.

use pretty_assertions::assert_eq;
use tuplet_interpreter::{Interpreter, RuntimeError, Value};
use tuplet_parser::{parse_expr, parse_program};

fn eval_expr(source: &str) -> Result<Value, RuntimeError> {
    let expr = parse_expr(source).unwrap_or_else(|e| panic!("parse error: {}", e));
    Interpreter::new().eval_expr(&expr)
}

fn run(source: &str) -> Result<Value, RuntimeError> {
    let program = parse_program(source).unwrap_or_else(|e| panic!("parse error: {}", e));
    Interpreter::new().run(&program)
}

fn number(n: f64) -> Result<Value, RuntimeError> {
    Ok(Value::Number(n))
}

// ============================================================================
// let-values
// ============================================================================

mod let_values {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sum_of_three() {
        assert_eq!(
            eval_expr("(let-values (((a b c) (values 1 2 3))) (+ a b c))"),
            number(6.0)
        );
    }

    #[test]
    fn test_tuple_returned_from_procedure() {
        assert_eq!(
            run("(program (define f (lambda (x) (values 1 2 3))) \
                 (let-values (((a b c) (f 0))) (+ a b c)))"),
            number(6.0)
        );
    }

    #[test]
    fn test_two_groups() {
        assert_eq!(
            eval_expr(
                "(let-values (((x y) (values 1 2)) ((a b c) (values 5 4 (+ 7 7)))) \
                 (* (+ y x) (+ c b y)))"
            ),
            number(60.0)
        );
    }

    #[test]
    fn test_mixed_element_kinds() {
        assert_eq!(
            eval_expr("(let-values (((n s) (values 1 #t))) (if s 3 5))"),
            number(3.0)
        );
    }

    #[test]
    fn test_width_mismatch_fails() {
        let result = eval_expr(
            "(let-values
                (((a) (values 1 2))
                 ((b c) (values 3)))
                (+ a b c))",
        );
        assert!(
            matches!(
                result,
                Err(RuntimeError::ArityMismatch { expected: 1, found: 2, .. })
            ),
            "{:?}",
            result
        );
    }

    #[test]
    fn test_body_sequence_with_define() {
        assert_eq!(
            run("(program (define x 7) \
                   (let-values (((a b c) (values 1 2 3)) ((d e f) (values 4 5 6))) \
                     (+ x b c) \
                     (+ (let-values (((y t) (values 4 5))) (* t y x)) (+ f d e))))"),
            number(155.0)
        );
    }

    #[test]
    fn test_shadowing_global_from_lambda_argument() {
        assert_eq!(
            run("(program
                   (define x 7)
                   (define f (lambda (a) (let-values (((x y z) a)) (+ x y z))))
                   (f (values x 2 3)))"),
            number(12.0)
        );
    }

    #[test]
    fn test_pattern_shadows_parameter_it_destructures() {
        assert_eq!(
            run("(program
                   (define x 7)
                   (define f (lambda (x) (let-values (((x y z) x)) (+ x y z))))
                   (f (values x 2 3)))"),
            number(12.0)
        );
    }

    #[test]
    fn test_nested_let_values_over_stored_tuple() {
        assert_eq!(
            run("(program
                   (define x 7)
                   (define f
                     (lambda (x)
                       (let-values (((y x z) x))
                         (+ x y (let-values (((z y x) z)) (+ x y z))))))
                   (f (values 2 x (values x 2 3))))"),
            number(21.0)
        );
    }

    #[test]
    fn test_nested_tuple_element() {
        assert_eq!(
            eval_expr("(let-values (((x y z) (values 1 (values 2 2.5 2.9) 3))) y)")
                .map(|v| v.to_string()),
            Ok("(values 2 2.5 2.9)".to_string())
        );
    }

    #[test]
    fn test_annotated_pattern_evaluates_the_same() {
        assert_eq!(
            eval_expr(
                "(let-values ((((n : number) (s : number)) (values 1 2) : (number * number))) \
                 (+ n s))"
            ),
            number(3.0)
        );
    }

    #[test]
    fn test_empty_tuple() {
        assert_eq!(eval_expr("(let-values ((() (values))) 1)"), number(1.0));
    }
}

// ============================================================================
// Core forms
// ============================================================================

mod core_forms {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_let_evaluates_in_outer_scope() {
        assert_eq!(
            eval_expr("(let ((x 1)) (let ((x 2) (y x)) (+ x y)))"),
            number(3.0)
        );
    }

    #[test]
    fn test_higher_order_procedure() {
        assert_eq!(
            eval_expr(
                "(let ((twice (lambda (f x) (f (f x))))) \
                   (twice (lambda (n) (* n n)) 3))"
            ),
            number(81.0)
        );
    }

    #[test]
    fn test_primitive_as_value() {
        assert_eq!(
            eval_expr("(let ((op +)) (op 1 2))"),
            number(3.0)
        );
    }

    #[test]
    fn test_recursive_define() {
        assert_eq!(
            run("(define (fib : (number -> number))
                   (lambda ((n : number)) : number
                     (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))
                 (fib 10)"),
            number(55.0)
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            eval_expr("(car (cdr (list 1 2 3)))"),
            number(2.0)
        );
        assert_eq!(eval_expr("(list? (cons 1 (list)))"), Ok(Value::Bool(true)));
    }
}

// ============================================================================
// Output and errors
// ============================================================================

mod output {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_collects_output() {
        let program = parse_program(
            "(display \"sum: \") (display (+ 1 2)) (newline) (display (values 1 \"a\"))",
        )
        .unwrap();
        let mut interp = Interpreter::new();
        assert_eq!(interp.run(&program), Ok(Value::Void));
        assert_eq!(interp.output(), "sum: 3\n(values 1 \"a\")");
    }

    #[test]
    fn test_state_persists_between_runs() {
        let mut interp = Interpreter::new();
        interp.run(&parse_program("(define x 5)").unwrap()).unwrap();
        assert_eq!(interp.run(&parse_program("(* x 2)").unwrap()), number(10.0));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_division_by_zero_span() {
        let err = eval_expr("(+ 1 (/ 4 0))").unwrap_err();
        assert_eq!(err, RuntimeError::DivisionByZero {
            span: tuplet_ast::Span::new(5, 12),
        });
    }

    #[test]
    fn test_not_a_tuple_message() {
        let err = eval_expr("(let-values (((a b) (+ 1 2))) a)").unwrap_err();
        assert_eq!(err.to_string(), "3 is not a tuple");
    }

    #[test]
    fn test_error_stops_evaluation() {
        let program = parse_program("(display 1) (car 5) (display 2)").unwrap();
        let mut interp = Interpreter::new();
        assert!(interp.run(&program).is_err());
        assert_eq!(interp.output(), "1");
    }
}
