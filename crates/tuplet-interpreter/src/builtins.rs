//! Primitive operations for the Tuplet evaluator.

use tuplet_ast::{PrimOp, Span};

use crate::value::Value;
use crate::{Result, RuntimeError};

/// Apply `op` to already evaluated arguments. `display` and `newline`
/// append to `output`.
pub fn apply(op: PrimOp, args: Vec<Value>, span: Span, output: &mut String) -> Result<Value> {
    match op {
        // Arithmetic
        PrimOp::Add => fold_numbers(op, &args, span, 0.0, |a, b| Ok(a + b)),
        PrimOp::Mul => fold_numbers(op, &args, span, 1.0, |a, b| Ok(a * b)),
        PrimOp::Sub => subtract(&args, span),
        PrimOp::Div => divide(&args, span),

        // Comparison
        PrimOp::Lt => compare(op, &args, span, |a, b| a < b),
        PrimOp::Gt => compare(op, &args, span, |a, b| a > b),
        PrimOp::NumEq => compare(op, &args, span, |a, b| a == b),

        // Logical
        PrimOp::And => {
            expect_arity(op, &args, 2, span)?;
            Ok(Value::Bool(boolean(op, &args[0], span)? && boolean(op, &args[1], span)?))
        }
        PrimOp::Or => {
            expect_arity(op, &args, 2, span)?;
            Ok(Value::Bool(boolean(op, &args[0], span)? || boolean(op, &args[1], span)?))
        }
        PrimOp::Not => {
            expect_arity(op, &args, 1, span)?;
            Ok(Value::Bool(!args[0].is_truthy()))
        }

        // Type predicates
        PrimOp::IsNumber => predicate(op, &args, span, |v| matches!(v, Value::Number(_))),
        PrimOp::IsBoolean => predicate(op, &args, span, |v| matches!(v, Value::Bool(_))),
        PrimOp::IsString => predicate(op, &args, span, |v| matches!(v, Value::Str(_))),
        // No expression evaluates to a symbol without quote.
        PrimOp::IsSymbol => predicate(op, &args, span, |_| false),
        PrimOp::IsList => predicate(op, &args, span, Value::is_list),

        // Equality
        PrimOp::Eq => {
            expect_arity(op, &args, 2, span)?;
            Ok(Value::Bool(args[0].is_eq(&args[1])))
        }
        PrimOp::StringEq => {
            expect_arity(op, &args, 2, span)?;
            match (&args[0], &args[1]) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a == b)),
                (Value::Str(_), other) | (other, _) => Err(type_mismatch(op, "string", other, span)),
            }
        }

        // Output
        PrimOp::Display => {
            expect_arity(op, &args, 1, span)?;
            output.push_str(&args[0].display_text());
            Ok(Value::Void)
        }
        PrimOp::Newline => {
            expect_arity(op, &args, 0, span)?;
            output.push('\n');
            Ok(Value::Void)
        }

        // Lists
        PrimOp::Cons => {
            expect_arity(op, &args, 2, span)?;
            let mut args = args.into_iter();
            match (args.next(), args.next()) {
                (Some(car), Some(cdr)) => Ok(Value::cons(car, cdr)),
                _ => Err(arity_error(op, 2, 0, span)),
            }
        }
        PrimOp::Car => {
            expect_arity(op, &args, 1, span)?;
            match &args[0] {
                Value::Pair(pair) => Ok(pair.0.clone()),
                other => Err(type_mismatch(op, "pair", other, span)),
            }
        }
        PrimOp::Cdr => {
            expect_arity(op, &args, 1, span)?;
            match &args[0] {
                Value::Pair(pair) => Ok(pair.1.clone()),
                other => Err(type_mismatch(op, "pair", other, span)),
            }
        }
        PrimOp::List => Ok(args
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, head| Value::cons(head, tail))),

        PrimOp::Values => Ok(Value::tuple(args)),
    }
}

fn expect_arity(op: PrimOp, args: &[Value], expected: usize, span: Span) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(arity_error(op, expected, args.len(), span))
    }
}

fn arity_error(op: PrimOp, expected: usize, found: usize, span: Span) -> RuntimeError {
    RuntimeError::ArityMismatch {
        what: format!("wrong number of arguments to {}", op),
        expected,
        found,
        span,
    }
}

fn type_mismatch(op: PrimOp, expected: &'static str, found: &Value, span: Span) -> RuntimeError {
    RuntimeError::TypeMismatch {
        op: op.name().into(),
        expected,
        found: found.type_name().to_string(),
        span,
    }
}

fn number(op: PrimOp, value: &Value, span: Span) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(type_mismatch(op, "number", other, span)),
    }
}

fn boolean(op: PrimOp, value: &Value, span: Span) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(type_mismatch(op, "boolean", other, span)),
    }
}

fn fold_numbers(
    op: PrimOp,
    args: &[Value],
    span: Span,
    init: f64,
    f: impl Fn(f64, f64) -> Result<f64>,
) -> Result<Value> {
    let mut acc = init;
    for arg in args {
        acc = f(acc, number(op, arg, span)?)?;
    }
    Ok(Value::Number(acc))
}

/// `(- x)` negates; `(- x y ...)` subtracts left to right.
fn subtract(args: &[Value], span: Span) -> Result<Value> {
    let op = PrimOp::Sub;
    match args {
        [] => Err(arity_error(op, 1, 0, span)),
        [only] => Ok(Value::Number(-number(op, only, span)?)),
        [first, rest @ ..] => {
            fold_numbers(op, rest, span, number(op, first, span)?, |a, b| Ok(a - b))
        }
    }
}

/// `(/ x)` is the reciprocal; `(/ x y ...)` divides left to right.
fn divide(args: &[Value], span: Span) -> Result<Value> {
    let op = PrimOp::Div;
    let checked = |a: f64, b: f64| {
        if b == 0.0 {
            Err(RuntimeError::DivisionByZero { span })
        } else {
            Ok(a / b)
        }
    };
    match args {
        [] => Err(arity_error(op, 1, 0, span)),
        [only] => Ok(Value::Number(checked(1.0, number(op, only, span)?)?)),
        [first, rest @ ..] => fold_numbers(op, rest, span, number(op, first, span)?, checked),
    }
}

fn compare(op: PrimOp, args: &[Value], span: Span, f: impl Fn(f64, f64) -> bool) -> Result<Value> {
    expect_arity(op, args, 2, span)?;
    let a = number(op, &args[0], span)?;
    let b = number(op, &args[1], span)?;
    Ok(Value::Bool(f(a, b)))
}

fn predicate(op: PrimOp, args: &[Value], span: Span, f: impl Fn(&Value) -> bool) -> Result<Value> {
    expect_arity(op, args, 1, span)?;
    Ok(Value::Bool(f(&args[0])))
}
