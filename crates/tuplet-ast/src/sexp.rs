//! S-expressions: the structural layer between tokens and the AST.

use smol_str::SmolStr;
use std::fmt;
use tuplet_lexer::Span;

/// An atomic datum
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// Number as written in the source; converted when the AST is built.
    Number(SmolStr),
    Bool(bool),
    String(SmolStr),
    Symbol(SmolStr),
}

/// A datum read from source text
#[derive(Debug, Clone, PartialEq)]
pub enum SExp {
    Atom(Atom, Span),
    List(Vec<SExp>, Span),
}

impl SExp {
    pub fn span(&self) -> Span {
        match self {
            SExp::Atom(_, span) | SExp::List(_, span) => *span,
        }
    }

    /// If this is a symbol, return its name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SExp::Atom(Atom::Symbol(s), _) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns true if this is a symbol with the given name.
    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    pub fn as_list(&self) -> Option<&[SExp]> {
        match self {
            SExp::List(items, _) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Number(n) => write!(f, "{}", n),
            Atom::Bool(true) => write!(f, "#t"),
            Atom::Bool(false) => write!(f, "#f"),
            Atom::String(s) => write!(f, "{}", crate::unparse::quote_string(s)),
            Atom::Symbol(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for SExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExp::Atom(atom, _) => write!(f, "{}", atom),
            SExp::List(items, _) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
