//! Expression evaluation for the Tuplet evaluator.

use std::rc::Rc;

use tracing::{debug, trace};
use tuplet_ast::{
    Binding, DefineDecl, Expr, ExprKind, Form, Lambda, Parsed, Program, Span, ValuesBinding,
};

use crate::builtins;
use crate::environment::Environment;
use crate::value::{Closure, Value};
use crate::{Result, RuntimeError};

/// The Tuplet evaluator.
///
/// Holds the global frame that `define` writes to and the text written by
/// `display` and `newline`, so several forms can be evaluated in sequence
/// against the same state.
pub struct Interpreter {
    globals: Environment,
    output: String,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            globals: Environment::new(),
            output: String::new(),
        }
    }

    /// Everything written so far by `display` and `newline`.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Run a program. Its value is the value of its last form, or void when
    /// it has none.
    pub fn run(&mut self, program: &Program) -> Result<Value> {
        let mut last = Value::Void;
        for (index, form) in program.forms.iter().enumerate() {
            debug!(form = index, "evaluating top-level form");
            last = self.eval_form(form)?;
        }
        Ok(last)
    }

    pub fn eval_parsed(&mut self, parsed: &Parsed) -> Result<Value> {
        match parsed {
            Parsed::Program(program) => self.run(program),
            Parsed::Form(form) => self.eval_form(form),
        }
    }

    pub fn eval_form(&mut self, form: &Form) -> Result<Value> {
        match form {
            Form::Define(def) => self.eval_define(def),
            Form::Expr(expr) => self.eval_expr(expr),
        }
    }

    /// The value is computed before the name is bound, so a define cannot
    /// refer to itself except from inside a lambda body.
    fn eval_define(&mut self, def: &DefineDecl) -> Result<Value> {
        let globals = self.globals.clone();
        let value = self.eval(&def.value, &globals)?;
        debug!(name = %def.var.name, "define");
        self.globals.define(def.var.name.clone(), value);
        Ok(Value::Void)
    }

    /// Evaluate an expression in the global environment.
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        let globals = self.globals.clone();
        self.eval(expr, &globals)
    }

    /// Evaluate an expression in `env`.
    pub fn eval(&mut self, expr: &Expr, env: &Environment) -> Result<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::String(s) => Ok(Value::Str(s.clone())),
            ExprKind::PrimOp(op) => Ok(Value::Primitive(*op)),

            ExprKind::Var(name) => match env.lookup(name) {
                Some(Some(value)) => Ok(value),
                Some(None) => Err(RuntimeError::Unassigned {
                    name: name.clone(),
                    span: expr.span,
                }),
                None => Err(RuntimeError::UnboundVariable {
                    name: name.clone(),
                    span: expr.span,
                }),
            },

            ExprKind::If {
                test,
                then_branch,
                else_branch,
            } => {
                if self.eval(test, env)?.is_truthy() {
                    self.eval(then_branch, env)
                } else {
                    self.eval(else_branch, env)
                }
            }

            ExprKind::Lambda(lambda) => Ok(make_closure(lambda, env)),

            ExprKind::App { rator, rands } => {
                let proc = self.eval(rator, env)?;
                let args = rands
                    .iter()
                    .map(|rand| self.eval(rand, env))
                    .collect::<Result<Vec<_>>>()?;
                self.apply(proc, args, expr.span)
            }

            ExprKind::Let { bindings, body } => self.eval_let(bindings, body, env),
            ExprKind::LetValues { bindings, body } => self.eval_let_values(bindings, body, env),
            ExprKind::Letrec { bindings, body } => self.eval_letrec(bindings, body, env),
        }
    }

    fn eval_body(&mut self, body: &[Expr], env: &Environment) -> Result<Value> {
        let mut last = Value::Void;
        for expr in body {
            last = self.eval(expr, env)?;
        }
        Ok(last)
    }

    /// Apply a procedure value to evaluated arguments.
    pub fn apply(&mut self, proc: Value, args: Vec<Value>, span: Span) -> Result<Value> {
        match proc {
            Value::Primitive(op) => {
                trace!(op = %op, args = args.len(), "apply primitive");
                builtins::apply(op, args, span, &mut self.output)
            }
            Value::Closure(closure) => {
                if closure.params.len() != args.len() {
                    return Err(RuntimeError::ArityMismatch {
                        what: "wrong number of arguments to procedure".to_string(),
                        expected: closure.params.len(),
                        found: args.len(),
                        span,
                    });
                }
                trace!(args = args.len(), "apply closure");
                let env = closure
                    .env
                    .extend(closure.params.iter().cloned().zip(args));
                self.eval_body(&closure.body, &env)
            }
            other => Err(RuntimeError::NotAProcedure {
                found: other.to_string(),
                span,
            }),
        }
    }

    /// All values are computed in the outer environment before the frame
    /// is built.
    fn eval_let(&mut self, bindings: &[Binding], body: &[Expr], env: &Environment) -> Result<Value> {
        let mut frame = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let value = self.eval(&binding.value, env)?;
            frame.push((binding.var.name.clone(), value));
        }
        self.eval_body(body, &env.extend(frame))
    }

    /// Each group's value must be a tuple exactly as wide as its pattern.
    /// Like `let`, every group is evaluated in the outer environment and all
    /// names land in one frame.
    fn eval_let_values(
        &mut self,
        groups: &[ValuesBinding],
        body: &[Expr],
        env: &Environment,
    ) -> Result<Value> {
        let mut frame = Vec::new();
        for group in groups {
            let elements = match self.eval(&group.value, env)? {
                Value::Tuple(elements) => elements,
                other => {
                    return Err(RuntimeError::NotATuple {
                        found: other.to_string(),
                        span: group.value.span,
                    })
                }
            };
            if elements.len() != group.vars.len() {
                return Err(RuntimeError::ArityMismatch {
                    what: "wrong number of values bound".to_string(),
                    expected: group.vars.len(),
                    found: elements.len(),
                    span: group.span,
                });
            }
            frame.extend(
                group
                    .vars
                    .iter()
                    .map(|var| var.name.clone())
                    .zip(elements.iter().cloned()),
            );
        }
        self.eval_body(body, &env.extend(frame))
    }

    /// The frame exists before any binding is evaluated so lambdas close
    /// over it; each slot is filled once its value is computed.
    fn eval_letrec(
        &mut self,
        bindings: &[Binding],
        body: &[Expr],
        env: &Environment,
    ) -> Result<Value> {
        let rec_env = env.extend_pending(bindings.iter().map(|b| b.var.name.clone()));
        for binding in bindings {
            let value = self.eval(&binding.value, &rec_env)?;
            rec_env.assign(&binding.var.name, value);
        }
        self.eval_body(body, &rec_env)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn make_closure(lambda: &Lambda, env: &Environment) -> Value {
    Value::Closure(Rc::new(Closure {
        params: lambda.params.iter().map(|p| p.name.clone()).collect(),
        body: lambda.body.clone(),
        env: env.clone(),
    }))
}
