//! Render AST nodes back into concrete syntax.
//!
//! Used by diagnostics to name the offending expression, and by the
//! `parse` CLI command. Declarations whose type was supplied by the parser
//! (not written in the source) are printed without an annotation.

use std::fmt::{self, Write};

use crate::{Binding, DefineDecl, Expr, ExprKind, Form, Lambda, Program, ValuesBinding, VarDecl};

/// Render an expression as source text.
pub fn unparse(expr: &Expr) -> String {
    expr.to_string()
}

pub fn unparse_form(form: &Form) -> String {
    form.to_string()
}

pub fn unparse_program(program: &Program) -> String {
    program.to_string()
}

/// Quote a string literal, escaping what the lexer unescapes.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn write_seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

fn write_decls(f: &mut fmt::Formatter<'_>, decls: &[VarDecl]) -> fmt::Result {
    f.write_char('(')?;
    for (i, decl) in decls.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{}", decl)?;
    }
    f.write_char(')')
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.annotated {
            write!(f, "({} : {})", self.name, self.texp)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.var, self.value)
    }
}

impl fmt::Display for ValuesBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        write_decls(f, &self.vars)?;
        write!(f, " {}", self.value)?;
        if let Some(declared) = &self.declared {
            write!(f, " : {}", declared)?;
        }
        f.write_char(')')
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(lambda ")?;
        write_decls(f, &self.params)?;
        if self.return_annotated {
            write!(f, " : {}", self.return_type)?;
        }
        write_seq(f, &self.body)?;
        f.write_char(')')
    }
}

fn write_binding_form<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    bindings: &[T],
    body: &[Expr],
) -> fmt::Result {
    write!(f, "({} (", keyword)?;
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write!(f, "{}", binding)?;
    }
    f.write_char(')')?;
    write_seq(f, body)?;
    f.write_char(')')
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{}", n),
            ExprKind::Bool(true) => write!(f, "#t"),
            ExprKind::Bool(false) => write!(f, "#f"),
            ExprKind::String(s) => write!(f, "{}", quote_string(s)),
            ExprKind::PrimOp(op) => write!(f, "{}", op),
            ExprKind::Var(name) => write!(f, "{}", name),
            ExprKind::If {
                test,
                then_branch,
                else_branch,
            } => write!(f, "(if {} {} {})", test, then_branch, else_branch),
            ExprKind::Lambda(lambda) => write!(f, "{}", lambda),
            ExprKind::App { rator, rands } => {
                write!(f, "({}", rator)?;
                write_seq(f, rands)?;
                f.write_char(')')
            }
            ExprKind::Let { bindings, body } => write_binding_form(f, "let", bindings, body),
            ExprKind::LetValues { bindings, body } => {
                write_binding_form(f, "let-values", bindings, body)
            }
            ExprKind::Letrec { bindings, body } => write_binding_form(f, "letrec", bindings, body),
        }
    }
}

impl fmt::Display for DefineDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(define {} {})", self.var, self.value)
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Define(def) => write!(f, "{}", def),
            Form::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(program")?;
        write_seq(f, &self.forms)?;
        f.write_char(')')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrimOp, Span, TExp};
    use pretty_assertions::assert_eq;

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::dummy())
    }

    fn num(n: f64) -> Expr {
        e(ExprKind::Number(n))
    }

    #[test]
    fn test_literals() {
        assert_eq!(unparse(&num(1.0)), "1");
        assert_eq!(unparse(&num(2.5)), "2.5");
        assert_eq!(unparse(&num(-3.0)), "-3");
        assert_eq!(unparse(&e(ExprKind::Bool(false))), "#f");
        assert_eq!(unparse(&e(ExprKind::String("a\"b".into()))), r#""a\"b""#);
    }

    #[test]
    fn test_if_application() {
        let app = e(ExprKind::App {
            rator: Box::new(e(ExprKind::PrimOp(PrimOp::Values))),
            rands: vec![num(1.0), num(2.0)],
        });
        let iff = e(ExprKind::If {
            test: Box::new(e(ExprKind::Bool(true))),
            then_branch: Box::new(app),
            else_branch: Box::new(e(ExprKind::String("a".into()))),
        });
        assert_eq!(unparse(&iff), r#"(if #t (values 1 2) "a")"#);
    }

    #[test]
    fn test_unannotated_declarations_print_bare() {
        let lambda = e(ExprKind::Lambda(Lambda {
            params: vec![
                VarDecl::new("x", TExp::Num, Span::dummy()),
                VarDecl {
                    name: "y".into(),
                    texp: TExp::tvar("T_1"),
                    annotated: false,
                    span: Span::dummy(),
                },
            ],
            return_type: TExp::tvar("T_2"),
            return_annotated: false,
            body: vec![e(ExprKind::Var("x".into()))],
        }));
        assert_eq!(unparse(&lambda), "(lambda ((x : number) y) x)");
    }

    #[test]
    fn test_let_values_with_trailing_annotation() {
        let group = ValuesBinding {
            vars: vec![
                VarDecl::new("n", TExp::Num, Span::dummy()),
                VarDecl::new("s", TExp::Num, Span::dummy()),
            ],
            value: e(ExprKind::App {
                rator: Box::new(e(ExprKind::PrimOp(PrimOp::Values))),
                rands: vec![num(1.0), num(2.0)],
            }),
            declared: Some(TExp::tuple(vec![TExp::Num, TExp::Num])),
            span: Span::dummy(),
        };
        let lv = e(ExprKind::LetValues {
            bindings: vec![group],
            body: vec![e(ExprKind::Var("n".into()))],
        });
        assert_eq!(
            unparse(&lv),
            "(let-values ((((n : number) (s : number)) (values 1 2) : (number * number))) n)"
        );
    }
}
