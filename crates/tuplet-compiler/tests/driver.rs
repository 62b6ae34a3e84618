//! End-to-end tests: source text in, type or failure text out.

use pretty_assertions::assert_eq;
use tuplet_compiler::{
    check_source, run_source, typeof_source, typeof_source_with, CompileError, CompileOptions,
};
use tuplet_diagnostics::render::{render_plain, render_short};
use tuplet_interpreter::{Interpreter, Value};
use tuplet_types::{CheckerConfig, TypeError};

/// The observable contract: the rendered type, or the failure message.
fn typeof_text(source: &str) -> String {
    typeof_source(source).unwrap_or_else(|e| e.to_string())
}

// ============================================================================
// typeof
// ============================================================================

mod type_of {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_values() {
        assert_eq!(typeof_text("(values 1 2)"), "(number * number)");
        assert_eq!(typeof_text("(values 10 3)"), "(number * number)");
        assert_eq!(
            typeof_text("(values 10 (+ 1 2) (> 5 4) #f)"),
            "(number * number * boolean * boolean)"
        );
        assert_eq!(
            typeof_text("(values 1 (values 2 2.5 2.9) 3)"),
            "(number * (number * number * number) * number)"
        );
    }

    #[test]
    fn test_lambdas_returning_tuples() {
        assert_eq!(
            typeof_text("(lambda () : (number * number) (values 1 2))"),
            "(Empty -> (number * number))"
        );
        assert_eq!(
            typeof_text("(lambda ((x : string) (y : string)) : (number * number) (values 1 2))"),
            "(string * string -> (number * number))"
        );
    }

    #[test]
    fn test_let_values() {
        assert_eq!(
            typeof_text("(let-values ((((x : number) (y : number)) (values 10 3))) (+ x y))"),
            "number"
        );
        assert_eq!(
            typeof_text("(let-values ((((n : number) (s : string)) (values 1 \"string\"))) s)"),
            "string"
        );
        assert_eq!(
            typeof_text(
                "(let-values ((((n : number) (s : number)) (values 1 2) : (number * number)) \
                              (((a : boolean) (t : number)) (values #t 3) : (boolean * number))) \
                   (if a (* n t) (* s t)))"
            ),
            "number"
        );
    }

    #[test]
    fn test_let_values_failures() {
        let sources = [
            "(let-values ((((n : boolean) (s : number)) (values 1 2) : (number * number)) \
                          (((a : boolean) (t : number)) (values #t 3) : (boolean * number))) \
               (if a (* n t) (* s t)))",
            "(let-values ((((n : boolean) (s : number)) (values #t 2) : (number * number)) \
                          (((a : boolean) (t : number)) (values #t 3) : (boolean * number))) \
               (if a (* n t) (* s t)))",
            "(let-values ((((n : number) (s : number)) (values #t 2) : (number * number)) \
                          (((a : boolean) (t : number)) (values #t 3) : (boolean * number))) \
               (if a (* n t) (* s t)))",
        ];
        for source in sources {
            assert!(
                matches!(typeof_source(source), Err(CompileError::Type(TypeError::Mismatch { .. }))),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            typeof_text("(if #t 1 \"a\")"),
            "Incompatible types: number and string in (if #t 1 \"a\")"
        );
        assert_eq!(
            typeof_text("(let-values ((((a : number)) (values 1 2))) a)"),
            "Wrong number of values bound: ((a : number)) and (number * number)"
        );
        assert_eq!(typeof_text("(let-values ((((a : number)) 5)) a)"), "number is not a tuple");
        assert_eq!(typeof_text("(+ y 1)"), "Var not found: y");
    }

    #[test]
    fn test_parse_failures_are_reported() {
        assert!(matches!(typeof_source("(if 1 2)"), Err(CompileError::Parse(_))));
        assert!(matches!(typeof_source("(values 1 2"), Err(CompileError::Parse(_))));
    }

    #[test]
    fn test_define_form_is_void() {
        assert_eq!(typeof_text("(define (x : number) 2)"), "void");
    }

    #[test]
    fn test_strict_define() {
        let source = "(define (x : number) #t)";
        assert_eq!(typeof_text(source), "void");
        assert!(matches!(
            typeof_source_with(source, &CheckerConfig::strict()),
            Err(CompileError::Type(TypeError::Mismatch { .. }))
        ));
    }
}

// ============================================================================
// check
// ============================================================================

mod check {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_program_of_bare_forms() {
        let source = "
            (define (square : (number -> number)) (lambda ((x : number)) : number (* x x)))
            (define (pair : (Empty -> (number * boolean))) (lambda () : (number * boolean) (values 2 #t)))
            (let-values ((((n : number) (b : boolean)) (pair))) (if b (square n) 0))
        ";
        assert_eq!(
            check_source(source, &CheckerConfig::default()).map(|te| te.to_string()),
            Ok("number".to_string())
        );
    }

    #[test]
    fn test_empty_file_is_void() {
        assert_eq!(
            check_source("", &CheckerConfig::default()).map(|te| te.to_string()),
            Ok("void".to_string())
        );
    }
}

// ============================================================================
// run
// ============================================================================

mod run {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(source: &str, type_check: bool) -> (Result<Value, CompileError>, String) {
        let options = CompileOptions {
            type_check,
            ..CompileOptions::default()
        };
        let mut interpreter = Interpreter::new();
        let result = run_source(source, &options, &mut interpreter);
        (result, interpreter.take_output())
    }

    #[test]
    fn test_checked_run() {
        let source = "
            (define (swap : (number * string -> (string * number)))
              (lambda ((n : number) (s : string)) : (string * number) (values s n)))
            (let-values ((((s : string) (n : number)) (swap 1 \"one\")))
              (newline)
              (+ n 1))
        ";
        let (result, output) = run(source, true);
        assert_eq!(result, Ok(Value::Number(2.0)));
        assert_eq!(output, "\n");
    }

    #[test]
    fn test_type_error_prevents_evaluation() {
        let (result, output) = run("(newline) (+ 1 #t)", true);
        assert!(matches!(result, Err(CompileError::Type(_))));
        assert_eq!(output, "");
    }

    #[test]
    fn test_unchecked_run_reports_runtime_error() {
        let (result, output) = run("(display \"side effect\") (+ 1 #t)", false);
        assert!(matches!(result, Err(CompileError::Runtime(_))));
        assert_eq!(output, "side effect");
    }

    #[test]
    fn test_unchecked_run_of_unannotated_program() {
        let (result, _) = run(
            "(define f (lambda (x) (values 1 2 3))) (let-values (((a b c) (f 0))) (+ a b c))",
            false,
        );
        assert_eq!(result, Ok(Value::Number(6.0)));
    }
}

// ============================================================================
// Rendered diagnostics
// ============================================================================

mod rendering {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diagnostic(source: &str) -> tuplet_diagnostics::Diagnostic {
        typeof_source(source)
            .expect_err("expected an error")
            .to_diagnostic()
            .in_file("input.tpl")
    }

    #[test]
    fn test_short_format() {
        let source = "(let-values ((((a : number)) 5)) a)";
        assert_eq!(
            render_short(&diagnostic(source), source),
            "input.tpl:1:30: error[E0004]: number is not a tuple"
        );
    }

    #[test]
    fn test_unclosed_paren() {
        let source = "(values 1\n  (+ 2 3)";
        insta::assert_snapshot!("unclosed_paren", render_plain(&diagnostic(source), source));
    }

    #[test]
    fn test_malformed_type() {
        let source = "(lambda ((x : (number ->))) x)";
        insta::assert_snapshot!("malformed_type", render_plain(&diagnostic(source), source));
    }
}
