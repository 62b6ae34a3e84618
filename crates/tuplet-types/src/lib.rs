//! Tuplet Language Type Checker
//!
//! Decides whether a fully annotated program is well typed and, if so,
//! computes its type.
//!
//! ## Checking, not inference
//!
//! Every lambda parameter, lambda return and let binding carries a declared
//! type. The checker never solves for unknowns: type variables are opaque
//! names that only match themselves, and two types are compatible exactly
//! when they are structurally identical (see [`check_equal_type`]).
//!
//! ## Tuples
//!
//! `(values e1 ... en)` has the tuple type `(t1 * ... * tn)`, or `Empty` for
//! no arguments. `let-values` destructures a tuple into names, and the
//! pattern width must equal the tuple width:
//!
//! ```text
//! (let-values ((((n : number) (s : string)) (values 1 "a"))) n)   ; number
//! (let-values ((((n : number)) (values 1 "a"))) n)                 ; E0005
//! ```
//!
//! ## Errors
//!
//! The first failure met in a left-to-right traversal is returned as a
//! [`TypeError`]; [`TypeError::to_diagnostic`] turns it into a structured
//! diagnostic.

pub mod check;
pub mod checker;
pub mod env;
pub mod error;
mod error_diagnostic;
mod primitives;

pub use check::{check_equal_type, Blame};
pub use checker::{CheckerConfig, DefinePolicy, TypeChecker};
pub use env::TypeEnv;
pub use error::{TypeError, TypeResult};
pub use primitives::primitive_signature;

use tuplet_ast::{Expr, TExp};

/// Type `expr` against the empty environment with the default configuration.
pub fn type_of_expr(expr: &Expr) -> TypeResult<TExp> {
    TypeChecker::new().type_of(expr, &TypeEnv::new())
}
