//! AST builder: s-expressions to the typed AST.
//!
//! Checks the shape of each special form and fills in a fresh type variable
//! wherever the source leaves a declaration unannotated.

use rustc_hash::FxHashSet;
use tracing::trace;
use tuplet_ast::{
    Atom, Binding, DefineDecl, Expr, ExprKind, Form, Lambda, Parsed, PrimOp, Program, SExp,
    SmolStr, Span, TExp, ValuesBinding, VarDecl, SPECIAL_FORMS,
};

use crate::{parse_texp, ParseError, ParseResult};

const COLON: &str = ":";
const FRESH_PREFIX: &str = "T_";

/// True when `sexp` is a `(program ...)` datum.
pub fn is_program(sexp: &SExp) -> bool {
    matches!(sexp.as_list(), Some([head, ..]) if head.is_symbol("program"))
}

fn is_define(sexp: &SExp) -> bool {
    matches!(sexp.as_list(), Some([head, ..]) if head.is_symbol("define"))
}

fn is_reserved(name: &str) -> bool {
    name == COLON || SPECIAL_FORMS.contains(&name) || PrimOp::from_name(name).is_some()
}

/// Builds AST nodes, numbering the type variables it invents.
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_tvar: usize,
    /// `T_<n>` names written in the source; never handed out as fresh.
    taken: FxHashSet<SmolStr>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder for `data` that will not invent a type variable the
    /// source already names.
    pub fn for_data<'a>(data: impl IntoIterator<Item = &'a SExp>) -> Self {
        let mut builder = Self::new();
        for sexp in data {
            builder.reserve_symbols(sexp);
        }
        builder
    }

    fn reserve_symbols(&mut self, sexp: &SExp) {
        match sexp {
            SExp::Atom(Atom::Symbol(name), _) if name.starts_with(FRESH_PREFIX) => {
                self.taken.insert(name.clone());
            }
            SExp::Atom(..) => {}
            SExp::List(items, _) => items.iter().for_each(|item| self.reserve_symbols(item)),
        }
    }

    /// A fresh `T_<n>` for an omitted annotation.
    fn fresh_tvar(&mut self) -> TExp {
        loop {
            self.next_tvar += 1;
            let name = SmolStr::new(format!("{}{}", FRESH_PREFIX, self.next_tvar));
            if !self.taken.contains(&name) {
                return TExp::tvar(name);
            }
        }
    }

    pub fn build_parsed(&mut self, sexp: &SExp) -> ParseResult<Parsed> {
        if is_program(sexp) {
            self.build_program(sexp).map(Parsed::Program)
        } else {
            self.build_form(sexp).map(Parsed::Form)
        }
    }

    /// `(program form ...)`
    pub fn build_program(&mut self, sexp: &SExp) -> ParseResult<Program> {
        let items = match sexp.as_list() {
            Some([head, rest @ ..]) if head.is_symbol("program") => rest,
            _ => return Err(invalid_expr(sexp, "expected `(program form ...)`")),
        };
        let forms = items
            .iter()
            .map(|item| self.build_form(item))
            .collect::<ParseResult<Vec<_>>>()?;
        trace!(forms = forms.len(), "built program");
        Ok(Program {
            forms,
            span: sexp.span(),
        })
    }

    pub fn build_form(&mut self, sexp: &SExp) -> ParseResult<Form> {
        if is_define(sexp) {
            self.build_define(sexp).map(Form::Define)
        } else {
            self.build_expr(sexp).map(Form::Expr)
        }
    }

    fn build_define(&mut self, sexp: &SExp) -> ParseResult<DefineDecl> {
        match sexp.as_list() {
            Some([_, decl, value]) => Ok(DefineDecl {
                var: self.build_decl(decl)?,
                value: self.build_expr(value)?,
                span: sexp.span(),
            }),
            _ => Err(invalid_expr(sexp, "expected `(define decl value)`")),
        }
    }

    pub fn build_expr(&mut self, sexp: &SExp) -> ParseResult<Expr> {
        let span = sexp.span();
        let items = match sexp {
            SExp::Atom(atom, _) => return self.build_atom(sexp, atom, span),
            SExp::List(items, _) => items,
        };

        let Some(head) = items.first() else {
            return Err(invalid_expr(sexp, "empty combination"));
        };

        let kind = match head.as_symbol() {
            Some("if") => self.build_if(sexp, items)?,
            Some("lambda") => ExprKind::Lambda(self.build_lambda(sexp, items)?),
            Some("let") => {
                let (bindings, body) = self.build_let_like(sexp, items, "let")?;
                ExprKind::Let { bindings, body }
            }
            Some("letrec") => {
                let (bindings, body) = self.build_let_like(sexp, items, "letrec")?;
                ExprKind::Letrec { bindings, body }
            }
            Some("let-values") => self.build_let_values(sexp, items)?,
            Some("define") => return Err(ParseError::DefineNotAllowed { span }),
            Some("program") => {
                return Err(invalid_expr(sexp, "`program` is only allowed at the top level"))
            }
            _ => {
                let rator = self.build_expr(head)?;
                let rands = items[1..]
                    .iter()
                    .map(|rand| self.build_expr(rand))
                    .collect::<ParseResult<Vec<_>>>()?;
                ExprKind::App {
                    rator: Box::new(rator),
                    rands,
                }
            }
        };
        Ok(Expr::new(kind, span))
    }

    fn build_atom(&mut self, sexp: &SExp, atom: &Atom, span: Span) -> ParseResult<Expr> {
        let kind = match atom {
            Atom::Number(text) => match text.parse::<f64>() {
                Ok(n) => ExprKind::Number(n),
                Err(_) => {
                    return Err(ParseError::InvalidNumber {
                        text: text.to_string(),
                        span,
                    })
                }
            },
            Atom::Bool(b) => ExprKind::Bool(*b),
            Atom::String(s) => ExprKind::String(s.clone()),
            Atom::Symbol(name) => {
                if let Some(op) = PrimOp::from_name(name) {
                    ExprKind::PrimOp(op)
                } else if name == COLON || SPECIAL_FORMS.contains(&name.as_str()) {
                    return Err(invalid_expr(sexp, "keyword used as a value"));
                } else {
                    ExprKind::Var(name.clone())
                }
            }
        };
        Ok(Expr::new(kind, span))
    }

    /// `(if test then else)`
    fn build_if(&mut self, sexp: &SExp, items: &[SExp]) -> ParseResult<ExprKind> {
        match items {
            [_, test, then_branch, else_branch] => Ok(ExprKind::If {
                test: Box::new(self.build_expr(test)?),
                then_branch: Box::new(self.build_expr(then_branch)?),
                else_branch: Box::new(self.build_expr(else_branch)?),
            }),
            _ => Err(invalid_expr(sexp, "expected `(if test then else)`")),
        }
    }

    /// `(lambda (decl ...) [: texp] body ...+)`
    fn build_lambda(&mut self, sexp: &SExp, items: &[SExp]) -> ParseResult<Lambda> {
        let Some(SExp::List(decls, _)) = items.get(1) else {
            return Err(invalid_expr(sexp, "expected a parameter list after `lambda`"));
        };
        let params = decls
            .iter()
            .map(|decl| self.build_decl(decl))
            .collect::<ParseResult<Vec<_>>>()?;

        let (return_type, return_annotated, body_start) = match items.get(2) {
            Some(colon) if colon.is_symbol(COLON) => {
                let texp = items
                    .get(3)
                    .ok_or_else(|| invalid_expr(sexp, "expected a return type after `:`"))?;
                (parse_texp(texp)?, true, 4)
            }
            _ => (self.fresh_tvar(), false, 2),
        };

        let body = self.build_body(sexp, &items[body_start.min(items.len())..], "lambda")?;
        Ok(Lambda {
            params,
            return_type,
            return_annotated,
            body,
        })
    }

    /// `(let ((decl value) ...) body ...+)`, and the same shape for `letrec`
    fn build_let_like(
        &mut self,
        sexp: &SExp,
        items: &[SExp],
        keyword: &str,
    ) -> ParseResult<(Vec<Binding>, Vec<Expr>)> {
        let Some(SExp::List(groups, _)) = items.get(1) else {
            return Err(invalid_expr(
                sexp,
                &format!("expected a binding list after `{}`", keyword),
            ));
        };
        let bindings = groups
            .iter()
            .map(|group| match group.as_list() {
                Some([decl, value]) => Ok(Binding {
                    var: self.build_decl(decl)?,
                    value: self.build_expr(value)?,
                    span: group.span(),
                }),
                _ => Err(invalid_expr(group, "expected `(decl value)`")),
            })
            .collect::<ParseResult<Vec<_>>>()?;
        let body = self.build_body(sexp, &items[2..], keyword)?;
        Ok((bindings, body))
    }

    /// `(let-values (((decl ...) value [: texp]) ...) body ...+)`
    fn build_let_values(&mut self, sexp: &SExp, items: &[SExp]) -> ParseResult<ExprKind> {
        let Some(SExp::List(groups, _)) = items.get(1) else {
            return Err(invalid_expr(sexp, "expected a binding list after `let-values`"));
        };
        let bindings = groups
            .iter()
            .map(|group| self.build_values_binding(group))
            .collect::<ParseResult<Vec<_>>>()?;
        let body = self.build_body(sexp, &items[2..], "let-values")?;
        Ok(ExprKind::LetValues { bindings, body })
    }

    fn build_values_binding(&mut self, group: &SExp) -> ParseResult<ValuesBinding> {
        let (decls, value, declared) = match group.as_list() {
            Some([SExp::List(decls, _), value]) => (decls, value, None),
            Some([SExp::List(decls, _), value, colon, texp]) if colon.is_symbol(COLON) => {
                (decls, value, Some(parse_texp(texp)?))
            }
            _ => {
                return Err(invalid_expr(
                    group,
                    "expected `((decl ...) value)` or `((decl ...) value : type)`",
                ))
            }
        };
        let vars = decls
            .iter()
            .map(|decl| self.build_decl(decl))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(ValuesBinding {
            vars,
            value: self.build_expr(value)?,
            declared,
            span: group.span(),
        })
    }

    fn build_body(&mut self, sexp: &SExp, items: &[SExp], keyword: &str) -> ParseResult<Vec<Expr>> {
        if items.is_empty() {
            return Err(invalid_expr(
                sexp,
                &format!("`{}` needs at least one body expression", keyword),
            ));
        }
        items.iter().map(|item| self.build_expr(item)).collect()
    }

    /// `name` or `(name : texp)`
    fn build_decl(&mut self, sexp: &SExp) -> ParseResult<VarDecl> {
        let span = sexp.span();
        match sexp {
            SExp::Atom(Atom::Symbol(name), _) => {
                check_bindable(name, span)?;
                let texp = self.fresh_tvar();
                Ok(VarDecl {
                    name: name.clone(),
                    texp,
                    annotated: false,
                    span,
                })
            }
            SExp::List(items, _) => match items.as_slice() {
                [SExp::Atom(Atom::Symbol(name), _), colon, texp] if colon.is_symbol(COLON) => {
                    check_bindable(name, span)?;
                    Ok(VarDecl::new(name.clone(), parse_texp(texp)?, span))
                }
                _ => Err(ParseError::InvalidDeclaration {
                    found: sexp.to_string(),
                    span,
                }),
            },
            _ => Err(ParseError::InvalidDeclaration {
                found: sexp.to_string(),
                span,
            }),
        }
    }
}

fn check_bindable(name: &str, span: Span) -> ParseResult<()> {
    if is_reserved(name) {
        return Err(ParseError::ReservedName {
            name: name.to_string(),
            span,
        });
    }
    Ok(())
}

fn invalid_expr(sexp: &SExp, hint: &str) -> ParseError {
    ParseError::InvalidExpression {
        found: sexp.to_string(),
        hint: hint.to_string(),
        span: sexp.span(),
    }
}
