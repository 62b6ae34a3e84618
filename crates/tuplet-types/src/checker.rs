//! The typing engine.
//!
//! One rule per AST variant, applied by recursive descent. Every rule returns
//! the first failure it meets; nothing is collected or recovered.

use tracing::{debug, trace};
use tuplet_ast::{
    Binding, DefineDecl, Expr, ExprKind, Form, Lambda, Parsed, PrimOp, Program, Span, TExp,
    ValuesBinding,
};

use crate::check::check_equal_type;
use crate::env::TypeEnv;
use crate::primitives::primitive_signature;
use crate::{TypeError, TypeResult};

/// How `define` is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefinePolicy {
    /// `define` has type `void` and its initializer is not examined.
    #[default]
    Permissive,
    /// The initializer is typed and must match the declared type.
    Checked,
}

#[derive(Debug, Clone, Default)]
pub struct CheckerConfig {
    pub define_policy: DefinePolicy,
}

impl CheckerConfig {
    /// Every rule on, including initializer checks for `define`.
    pub fn strict() -> Self {
        Self {
            define_policy: DefinePolicy::Checked,
        }
    }
}

/// Type checker for fully annotated Tuplet programs
#[derive(Debug, Clone, Default)]
pub struct TypeChecker {
    config: CheckerConfig,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Type whatever the parser produced, starting from an empty environment.
    pub fn check_parsed(&self, parsed: &Parsed) -> TypeResult<TExp> {
        match parsed {
            Parsed::Program(program) => self.check_program(program),
            Parsed::Form(form) => self.check_form(form, &TypeEnv::new()),
        }
    }

    /// The type of a program is the type of its last form.
    ///
    /// Forms are typed left to right against one environment that each
    /// `define` extends with its declared type. An empty program is `void`.
    pub fn check_program(&self, program: &Program) -> TypeResult<TExp> {
        debug!(forms = program.forms.len(), "type checking program");
        let mut env = TypeEnv::new();
        let mut last = TExp::Void;
        for form in &program.forms {
            last = match form {
                Form::Define(def) => {
                    env = env.extend([(def.var.name.clone(), def.var.texp.clone())]);
                    self.check_define(def, &env)?
                }
                Form::Expr(expr) => self.type_of(expr, &env)?,
            };
        }
        Ok(last)
    }

    /// Type a single top-level form. A `define` may refer to itself.
    pub fn check_form(&self, form: &Form, env: &TypeEnv) -> TypeResult<TExp> {
        match form {
            Form::Define(def) => {
                let env = env.extend([(def.var.name.clone(), def.var.texp.clone())]);
                self.check_define(def, &env)
            }
            Form::Expr(expr) => self.type_of(expr, env),
        }
    }

    /// `(define (x : t) value)` has type `void`.
    ///
    /// `env` must already bind the defined name. Under
    /// [`DefinePolicy::Checked`] the value's type must equal `t`.
    pub fn check_define(&self, def: &DefineDecl, env: &TypeEnv) -> TypeResult<TExp> {
        trace!(name = %def.var.name, "define");
        if self.config.define_policy == DefinePolicy::Checked {
            let value_te = self.type_of(&def.value, env)?;
            check_equal_type(&def.var.texp, &value_te, def)?;
        }
        Ok(TExp::Void)
    }

    /// Type an expression in `env`.
    pub fn type_of(&self, expr: &Expr, env: &TypeEnv) -> TypeResult<TExp> {
        match &expr.kind {
            ExprKind::Number(_) => Ok(TExp::Num),
            ExprKind::Bool(_) => Ok(TExp::Bool),
            ExprKind::String(_) => Ok(TExp::Str),
            ExprKind::PrimOp(op) => type_of_prim(*op, expr.span),
            ExprKind::Var(name) => env.apply(name, expr.span),
            ExprKind::If {
                test,
                then_branch,
                else_branch,
            } => self.type_of_if(expr, test, then_branch, else_branch, env),
            ExprKind::Lambda(lambda) => self.type_of_lambda(expr, lambda, env),
            ExprKind::App { rator, rands } => self.type_of_app(expr, rator, rands, env),
            ExprKind::Let { bindings, body } => self.type_of_let(expr, bindings, body, env),
            ExprKind::LetValues { bindings, body } => {
                self.type_of_let_values(expr, bindings, body, env)
            }
            ExprKind::Letrec { bindings, body } => self.type_of_letrec(expr, bindings, body, env),
        }
    }

    /// Type a body left to right; the result is the type of the last expression.
    pub fn type_of_body(&self, body: &[Expr], env: &TypeEnv) -> TypeResult<TExp> {
        debug_assert!(!body.is_empty(), "bodies are never empty after parsing");
        let mut last = TExp::Void;
        for expr in body {
            last = self.type_of(expr, env)?;
        }
        Ok(last)
    }

    // ========================================================================
    // Rules
    // ========================================================================

    /// All three parts are typed before either constraint is checked; the
    /// test constraint is reported first.
    fn type_of_if(
        &self,
        expr: &Expr,
        test: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        env: &TypeEnv,
    ) -> TypeResult<TExp> {
        trace!("if");
        let test_te = self.type_of(test, env);
        let then_te = self.type_of(then_branch, env);
        let else_te = self.type_of(else_branch, env);

        let test_ok = test_te.and_then(|te| check_equal_type(&te, &TExp::Bool, expr));
        let branches_ok = match (&then_te, &else_te) {
            (Ok(then_te), Ok(else_te)) => check_equal_type(then_te, else_te, expr),
            (Err(err), _) | (_, Err(err)) => Err(err.clone()),
        };
        test_ok?;
        branches_ok?;
        then_te
    }

    fn type_of_lambda(&self, expr: &Expr, lambda: &Lambda, env: &TypeEnv) -> TypeResult<TExp> {
        trace!(params = lambda.params.len(), "lambda");
        let body_env = env.extend(
            lambda
                .params
                .iter()
                .map(|p| (p.name.clone(), p.texp.clone())),
        );
        let body_te = self.type_of_body(&lambda.body, &body_env)?;
        check_equal_type(&body_te, &lambda.return_type, expr)?;
        Ok(lambda.signature())
    }

    fn type_of_app(
        &self,
        expr: &Expr,
        rator: &Expr,
        rands: &[Expr],
        env: &TypeEnv,
    ) -> TypeResult<TExp> {
        if rator.kind == ExprKind::PrimOp(PrimOp::Values) {
            return self.type_of_values(rands, env);
        }

        trace!(rands = rands.len(), "application");
        let (params, ret) = match self.type_of(rator, env)? {
            TExp::Proc { params, ret } => (params, ret),
            other => {
                return Err(TypeError::NotAProcedure {
                    found: other.to_string(),
                    context: expr.to_string(),
                    span: expr.span,
                })
            }
        };
        if params.len() != rands.len() {
            return Err(TypeError::ArityMismatch {
                expected: params.len(),
                found: rands.len(),
                context: expr.to_string(),
                span: expr.span,
            });
        }
        for (rand, param_te) in rands.iter().zip(&params) {
            let rand_te = self.type_of(rand, env)?;
            check_equal_type(&rand_te, param_te, expr)?;
        }
        Ok(*ret)
    }

    /// `(values e ...)` has the tuple of its argument types.
    fn type_of_values(&self, rands: &[Expr], env: &TypeEnv) -> TypeResult<TExp> {
        trace!(width = rands.len(), "values");
        let elems = rands
            .iter()
            .map(|rand| self.type_of(rand, env))
            .collect::<TypeResult<Vec<_>>>()?;
        Ok(TExp::tuple(elems))
    }

    /// Values are typed in the outer environment; the body sees all bindings
    /// in one new frame.
    fn type_of_let(
        &self,
        expr: &Expr,
        bindings: &[Binding],
        body: &[Expr],
        env: &TypeEnv,
    ) -> TypeResult<TExp> {
        trace!(bindings = bindings.len(), "let");
        for binding in bindings {
            let value_te = self.type_of(&binding.value, env)?;
            check_equal_type(&binding.var.texp, &value_te, expr)?;
        }
        let body_env = env.extend(
            bindings
                .iter()
                .map(|b| (b.var.name.clone(), b.var.texp.clone())),
        );
        self.type_of_body(body, &body_env)
    }

    /// Each group's value must be a tuple as wide as its pattern, with
    /// element types matching the declared ones. All groups are checked
    /// before the body's frame is built.
    fn type_of_let_values(
        &self,
        expr: &Expr,
        groups: &[ValuesBinding],
        body: &[Expr],
        env: &TypeEnv,
    ) -> TypeResult<TExp> {
        for (index, group) in groups.iter().enumerate() {
            debug!(group = index, names = group.vars.len(), "let-values group");
            let value_te = self.type_of(&group.value, env)?;
            let elems = value_te.tuple_elements().ok_or_else(|| TypeError::NotATuple {
                found: value_te.to_string(),
                span: group.value.span,
            })?;
            if elems.len() != group.vars.len() {
                return Err(TypeError::TupleArityMismatch {
                    pattern: render_pattern(group),
                    tuple: value_te.to_string(),
                    expected: group.vars.len(),
                    found: elems.len(),
                    span: group.span,
                });
            }
            for (var, elem_te) in group.vars.iter().zip(elems) {
                check_equal_type(&var.texp, elem_te, expr)?;
            }
        }

        let body_env = env.extend(
            groups
                .iter()
                .flat_map(|g| g.vars.iter())
                .map(|v| (v.name.clone(), v.texp.clone())),
        );
        self.type_of_body(body, &body_env)
    }

    /// Every binding must be a lambda. The names are bound to their declared
    /// signatures both in the body and inside every lambda.
    fn type_of_letrec(
        &self,
        expr: &Expr,
        bindings: &[Binding],
        body: &[Expr],
        env: &TypeEnv,
    ) -> TypeResult<TExp> {
        trace!(bindings = bindings.len(), "letrec");
        let mut lambdas = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding.value.as_lambda() {
                Some(lambda) => lambdas.push(lambda),
                None => {
                    return Err(TypeError::LetrecOnlyProcedures {
                        context: expr.to_string(),
                        binding_span: binding.value.span,
                        span: expr.span,
                    })
                }
            }
        }

        let body_env = env.extend(
            bindings
                .iter()
                .zip(&lambdas)
                .map(|(b, lambda)| (b.var.name.clone(), lambda.signature())),
        );

        // Every lambda body is typed before any return type is compared
        let body_types = lambdas
            .iter()
            .map(|lambda| {
                let lambda_env = body_env.extend(
                    lambda
                        .params
                        .iter()
                        .map(|p| (p.name.clone(), p.texp.clone())),
                );
                self.type_of_body(&lambda.body, &lambda_env)
            })
            .collect::<TypeResult<Vec<_>>>()?;
        for (body_te, lambda) in body_types.iter().zip(&lambdas) {
            check_equal_type(body_te, &lambda.return_type, expr)?;
        }

        self.type_of_body(body, &body_env)
    }
}

fn type_of_prim(op: PrimOp, span: Span) -> TypeResult<TExp> {
    primitive_signature(op)
        .cloned()
        .ok_or_else(|| TypeError::UnknownPrimitive {
            op: op.name().to_string(),
            span,
        })
}

/// `((a : number) (b : string))`
fn render_pattern(group: &ValuesBinding) -> String {
    let decls: Vec<String> = group.vars.iter().map(ToString::to_string).collect();
    format!("({})", decls.join(" "))
}
