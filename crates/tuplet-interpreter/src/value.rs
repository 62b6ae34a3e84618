//! Runtime values for the Tuplet evaluator.

use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;
use tuplet_ast::unparse::quote_string;
use tuplet_ast::{Expr, PrimOp};

use crate::Environment;

/// Runtime values.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(SmolStr),

    /// Result of forms evaluated for effect (`define`, `display`, `newline`)
    Void,

    /// The empty list
    Nil,
    Pair(Rc<(Value, Value)>),

    /// Multiple values produced by `values`; zero elements is the empty tuple
    Tuple(Rc<Vec<Value>>),

    Primitive(PrimOp),
    Closure(Rc<Closure>),
}

/// A user procedure together with the environment it was created in.
pub struct Closure {
    pub params: Vec<SmolStr>,
    pub body: Vec<Expr>,
    pub env: Environment,
}

// The captured environment can reach the closure itself through a letrec frame.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Value {
    /// Get the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Void => "void",
            Value::Nil => "empty list",
            Value::Pair(_) => "pair",
            Value::Tuple(_) => "tuple",
            Value::Primitive(_) | Value::Closure(_) => "procedure",
        }
    }

    /// Everything except `#f` counts as true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    /// A proper list: `'()` or a chain of pairs ending in `'()`.
    pub fn is_list(&self) -> bool {
        let mut current = self;
        loop {
            match current {
                Value::Nil => return true,
                Value::Pair(pair) => current = &pair.1,
                _ => return false,
            }
        }
    }

    pub fn tuple(elements: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(elements))
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new((car, cdr)))
    }

    /// Identity comparison used by `eq?`: atoms by value, compound values by
    /// reference.
    pub fn is_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    /// Text written by `display`: strings without quotes.
    pub fn display_text(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Void, Value::Void) => true,
            (Value::Nil, Value::Nil) => true,
            (Value::Pair(a), Value::Pair(b)) => a.0 == b.0 && a.1 == b.1,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Str(s) => write!(f, "{}", quote_string(s)),
            Value::Void => write!(f, "#<void>"),
            Value::Nil => write!(f, "'()"),
            Value::Pair(pair) => {
                write!(f, "({}", pair.0)?;
                let mut rest = &pair.1;
                loop {
                    match rest {
                        Value::Nil => break,
                        Value::Pair(next) => {
                            write!(f, " {}", next.0)?;
                            rest = &next.1;
                        }
                        tail => {
                            write!(f, " . {}", tail)?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Tuple(elements) => {
                write!(f, "(values")?;
                for element in elements.iter() {
                    write!(f, " {}", element)?;
                }
                write!(f, ")")
            }
            Value::Primitive(op) => write!(f, "#<primitive {}>", op),
            Value::Closure(closure) => write!(f, "#<procedure/{}>", closure.params.len()),
        }
    }
}
