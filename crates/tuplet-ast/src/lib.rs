//! Tuplet Language Abstract Syntax Tree
//!
//! Defines the s-expression layer, the typed AST that the type checker and
//! the interpreter consume, and the type expressions used in annotations.
//! Nodes are immutable once built.

pub mod sexp;
pub mod texp;
pub mod unparse;

// Re-export common types for use by other crates
pub use smol_str::SmolStr;
pub use tuplet_lexer::Span;

pub use sexp::{Atom, SExp};
pub use texp::{TExp, TupleTExp};
pub use unparse::{unparse, unparse_form, unparse_program};

// ============================================================================
// Program Structure
// ============================================================================

/// A complete program: `(program form ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub forms: Vec<Form>,
    pub span: Span,
}

/// A top-level form
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    Define(DefineDecl),
    Expr(Expr),
}

impl Form {
    pub fn span(&self) -> Span {
        match self {
            Form::Define(def) => def.span,
            Form::Expr(expr) => expr.span,
        }
    }
}

/// Anything the parser can hand to the checker or the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Program(Program),
    Form(Form),
}

/// `(define decl value)`
#[derive(Debug, Clone, PartialEq)]
pub struct DefineDecl {
    pub var: VarDecl,
    pub value: Expr,
    pub span: Span,
}

// ============================================================================
// Declarations
// ============================================================================

/// A bound name and its declared type.
///
/// `annotated` is false when the source omitted the annotation and the parser
/// supplied a fresh type variable; the un-parser prints such declarations as
/// a bare name.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: SmolStr,
    pub texp: TExp,
    pub annotated: bool,
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: impl Into<SmolStr>, texp: TExp, span: Span) -> Self {
        Self {
            name: name.into(),
            texp,
            annotated: true,
            span,
        }
    }
}

/// `(decl value)` in `let` and `letrec`
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub var: VarDecl,
    pub value: Expr,
    pub span: Span,
}

/// `((decl ...) value [: texp])` in `let-values`
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesBinding {
    pub vars: Vec<VarDecl>,
    pub value: Expr,
    /// Optional trailing annotation on the value. Kept for round-tripping.
    pub declared: Option<TExp>,
    pub span: Span,
}

/// `(lambda (decl ...) [: texp] body ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub params: Vec<VarDecl>,
    pub return_type: TExp,
    pub return_annotated: bool,
    pub body: Vec<Expr>,
}

impl Lambda {
    /// The declared signature `(t1 * ... * tn -> t)`.
    pub fn signature(&self) -> TExp {
        TExp::proc(
            self.params.iter().map(|p| p.texp.clone()).collect(),
            self.return_type.clone(),
        )
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn as_lambda(&self) -> Option<&Lambda> {
        match &self.kind {
            ExprKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // Literals
    Number(f64),
    Bool(bool),
    String(SmolStr),

    PrimOp(PrimOp),
    Var(SmolStr),

    If {
        test: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Lambda(Lambda),
    App {
        rator: Box<Expr>,
        rands: Vec<Expr>,
    },
    Let {
        bindings: Vec<Binding>,
        body: Vec<Expr>,
    },
    LetValues {
        bindings: Vec<ValuesBinding>,
        body: Vec<Expr>,
    },
    /// Bindings are not restricted to lambdas here; the checker rejects others.
    Letrec {
        bindings: Vec<Binding>,
        body: Vec<Expr>,
    },
}

// ============================================================================
// Primitive Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Lt,
    Gt,
    NumEq,

    // Logical
    And,
    Or,
    Not,

    // Type predicates
    IsNumber,
    IsBoolean,
    IsString,
    IsSymbol,
    IsList,

    // Equality
    Eq,
    StringEq,

    // Output
    Display,
    Newline,

    // Lists
    Cons,
    Car,
    Cdr,
    List,

    /// Variadic multiple-value constructor
    Values,
}

impl PrimOp {
    pub const ALL: [PrimOp; 24] = [
        PrimOp::Add,
        PrimOp::Sub,
        PrimOp::Mul,
        PrimOp::Div,
        PrimOp::Lt,
        PrimOp::Gt,
        PrimOp::NumEq,
        PrimOp::And,
        PrimOp::Or,
        PrimOp::Not,
        PrimOp::IsNumber,
        PrimOp::IsBoolean,
        PrimOp::IsString,
        PrimOp::IsSymbol,
        PrimOp::IsList,
        PrimOp::Eq,
        PrimOp::StringEq,
        PrimOp::Display,
        PrimOp::Newline,
        PrimOp::Cons,
        PrimOp::Car,
        PrimOp::Cdr,
        PrimOp::List,
        PrimOp::Values,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimOp::Add => "+",
            PrimOp::Sub => "-",
            PrimOp::Mul => "*",
            PrimOp::Div => "/",
            PrimOp::Lt => "<",
            PrimOp::Gt => ">",
            PrimOp::NumEq => "=",
            PrimOp::And => "and",
            PrimOp::Or => "or",
            PrimOp::Not => "not",
            PrimOp::IsNumber => "number?",
            PrimOp::IsBoolean => "boolean?",
            PrimOp::IsString => "string?",
            PrimOp::IsSymbol => "symbol?",
            PrimOp::IsList => "list?",
            PrimOp::Eq => "eq?",
            PrimOp::StringEq => "string=?",
            PrimOp::Display => "display",
            PrimOp::Newline => "newline",
            PrimOp::Cons => "cons",
            PrimOp::Car => "car",
            PrimOp::Cdr => "cdr",
            PrimOp::List => "list",
            PrimOp::Values => "values",
        }
    }

    pub fn from_name(name: &str) -> Option<PrimOp> {
        PrimOp::ALL.iter().copied().find(|op| op.name() == name)
    }
}

impl std::fmt::Display for PrimOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Keywords that introduce special forms and cannot be bound as names
pub const SPECIAL_FORMS: &[&str] = &[
    "if",
    "lambda",
    "let",
    "let-values",
    "letrec",
    "define",
    "program",
];
