//! Type-expression parser.
//!
//! ```text
//! texp  := atom | Empty | tvar
//!        | (texp * ... * texp)            ; non-empty tuple
//!        | (Empty -> texp)                ; thunk
//!        | (texp * ... * texp -> texp)    ; procedure
//! ```

use tuplet_ast::texp::{ARROW, EMPTY, STAR};
use tuplet_ast::{Atom, SExp, TExp};

use crate::{read_one, ParseError, ParseResult};

/// Parse a type expression from source text, e.g. `"(number * T -> boolean)"`.
pub fn parse_texp_str(source: &str) -> ParseResult<TExp> {
    let sexp = read_one(source)?;
    parse_texp(&sexp)
}

/// Parse a type expression from an already-read datum.
pub fn parse_texp(sexp: &SExp) -> ParseResult<TExp> {
    match sexp {
        SExp::Atom(Atom::Symbol(name), _) => parse_atomic(sexp, name),
        SExp::Atom(..) => Err(invalid(sexp, "expected a type name or a compound type")),
        SExp::List(items, _) => parse_compound(sexp, items),
    }
}

fn parse_atomic(sexp: &SExp, name: &str) -> ParseResult<TExp> {
    if name == ARROW || name == STAR {
        return Err(invalid(sexp, "separator outside of a compound type"));
    }
    if name == EMPTY {
        return Ok(TExp::tuple(vec![]));
    }
    Ok(TExp::atomic(name).unwrap_or_else(|| TExp::tvar(name)))
}

fn parse_compound(sexp: &SExp, items: &[SExp]) -> ParseResult<TExp> {
    if items.is_empty() {
        return Err(invalid(sexp, "empty type expression"));
    }

    let arrows: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_symbol(ARROW))
        .map(|(i, _)| i)
        .collect();

    match arrows.as_slice() {
        [] => Ok(TExp::tuple(parse_starred(sexp, items)?)),
        [arrow] => {
            let (before, after) = (&items[..*arrow], &items[arrow + 1..]);
            let ret = match after {
                [ret] => parse_texp(ret)?,
                _ => return Err(invalid(sexp, "expected exactly one type after `->`")),
            };
            let params = match before {
                [only] if only.is_symbol(EMPTY) => vec![],
                [] => return Err(invalid(sexp, "expected parameter types before `->`")),
                _ => parse_starred(sexp, before)?,
            };
            Ok(TExp::proc(params, ret))
        }
        _ => Err(invalid(sexp, "more than one `->` in a procedure type")),
    }
}

/// `T1 * T2 * ... * Tn`: types at even positions, stars at odd positions.
fn parse_starred(whole: &SExp, items: &[SExp]) -> ParseResult<Vec<TExp>> {
    if items.len() % 2 == 0 {
        return Err(invalid(whole, "expected types separated by `*`"));
    }
    let mut texps = Vec::with_capacity(items.len() / 2 + 1);
    for (i, item) in items.iter().enumerate() {
        if i % 2 == 1 {
            if !item.is_symbol(STAR) {
                return Err(invalid(whole, "expected `*` between types"));
            }
        } else {
            texps.push(parse_texp(item)?);
        }
    }
    Ok(texps)
}

fn invalid(sexp: &SExp, hint: &str) -> ParseError {
    ParseError::InvalidType {
        found: sexp.to_string(),
        hint: hint.to_string(),
        span: sexp.span(),
    }
}
