//! Type expressions.
//!
//! The closed grammar of types that annotations are written in and that the
//! checker computes. Two type expressions are compatible exactly when they are
//! structurally equal, so `PartialEq` is the compatibility relation.
//!
//! The `Display` impl is the un-parser: it renders a type back into the
//! concrete grammar `atom | (T1 * ... * Tn) | (T1 * ... * Tn -> T)`.

use smol_str::SmolStr;
use std::fmt;

pub const NUMBER: &str = "number";
pub const BOOLEAN: &str = "boolean";
pub const STRING: &str = "string";
pub const VOID: &str = "void";
/// Written for an empty parameter list and for the zero-element tuple.
pub const EMPTY: &str = "Empty";
pub const ARROW: &str = "->";
pub const STAR: &str = "*";

/// A type expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TExp {
    Num,
    Bool,
    Str,
    Void,
    /// Opaque placeholder, equal only to a variable of the same name
    TVar(SmolStr),
    /// Procedure signature; arity is `params.len()`
    Proc { params: Vec<TExp>, ret: Box<TExp> },
    /// Result type of `values`
    Tuple(TupleTExp),
}

/// Shape of a tuple type.
///
/// The zero-width tuple is its own shape so that `(values)` never looks like a
/// tuple with elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TupleTExp {
    Empty,
    /// Never constructed with an empty vector; use [`TExp::tuple`].
    NonEmpty(Vec<TExp>),
}

impl TupleTExp {
    pub fn elements(&self) -> &[TExp] {
        match self {
            TupleTExp::Empty => &[],
            TupleTExp::NonEmpty(elems) => elems,
        }
    }

    pub fn len(&self) -> usize {
        self.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TupleTExp::Empty)
    }
}

impl TExp {
    pub fn proc(params: Vec<TExp>, ret: TExp) -> Self {
        TExp::Proc {
            params,
            ret: Box::new(ret),
        }
    }

    /// Build a tuple type, choosing the `Empty` shape for zero elements.
    pub fn tuple(elems: Vec<TExp>) -> Self {
        if elems.is_empty() {
            TExp::Tuple(TupleTExp::Empty)
        } else {
            TExp::Tuple(TupleTExp::NonEmpty(elems))
        }
    }

    pub fn tvar(name: impl Into<SmolStr>) -> Self {
        TExp::TVar(name.into())
    }

    /// Look up one of the built-in atomic type names.
    pub fn atomic(name: &str) -> Option<TExp> {
        match name {
            NUMBER => Some(TExp::Num),
            BOOLEAN => Some(TExp::Bool),
            STRING => Some(TExp::Str),
            VOID => Some(TExp::Void),
            _ => None,
        }
    }

    /// The component types when this is a tuple.
    pub fn tuple_elements(&self) -> Option<&[TExp]> {
        match self {
            TExp::Tuple(tuple) => Some(tuple.elements()),
            _ => None,
        }
    }
}

fn write_starred(f: &mut fmt::Formatter<'_>, items: &[TExp]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", STAR)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for TExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TExp::Num => write!(f, "{}", NUMBER),
            TExp::Bool => write!(f, "{}", BOOLEAN),
            TExp::Str => write!(f, "{}", STRING),
            TExp::Void => write!(f, "{}", VOID),
            TExp::TVar(name) => write!(f, "{}", name),
            TExp::Proc { params, ret } => {
                write!(f, "(")?;
                if params.is_empty() {
                    write!(f, "{}", EMPTY)?;
                } else {
                    write_starred(f, params)?;
                }
                write!(f, " {} {})", ARROW, ret)
            }
            TExp::Tuple(TupleTExp::Empty) => write!(f, "{}", EMPTY),
            TExp::Tuple(TupleTExp::NonEmpty(elems)) => {
                write!(f, "(")?;
                write_starred(f, elems)?;
                write!(f, ")")
            }
        }
    }
}
