//! Signatures of the primitive operators.
//!
//! `values` is deliberately absent: its arity and result shape depend on the
//! call site, so the checker types it with a dedicated rule. The list
//! operators have no signature either.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use tuplet_ast::{PrimOp, TExp};

/// Get the static signature table, built on first use.
fn primitive_type_lookup() -> &'static FxHashMap<PrimOp, TExp> {
    static PRIMITIVES: OnceLock<FxHashMap<PrimOp, TExp>> = OnceLock::new();
    PRIMITIVES.get_or_init(|| {
        let num_op = TExp::proc(vec![TExp::Num, TExp::Num], TExp::Num);
        let num_comp = TExp::proc(vec![TExp::Num, TExp::Num], TExp::Bool);
        let bool_op = TExp::proc(vec![TExp::Bool, TExp::Bool], TExp::Bool);
        let type_pred = TExp::proc(vec![TExp::tvar("T")], TExp::Bool);
        let binary_pred = TExp::proc(vec![TExp::tvar("T1"), TExp::tvar("T2")], TExp::Bool);

        let mut map = FxHashMap::default();
        for op in [PrimOp::Add, PrimOp::Sub, PrimOp::Mul, PrimOp::Div] {
            map.insert(op, num_op.clone());
        }
        for op in [PrimOp::Lt, PrimOp::Gt, PrimOp::NumEq] {
            map.insert(op, num_comp.clone());
        }
        for op in [PrimOp::And, PrimOp::Or] {
            map.insert(op, bool_op.clone());
        }
        for op in [
            PrimOp::IsNumber,
            PrimOp::IsBoolean,
            PrimOp::IsString,
            PrimOp::IsSymbol,
            PrimOp::IsList,
        ] {
            map.insert(op, type_pred.clone());
        }
        map.insert(PrimOp::Not, TExp::proc(vec![TExp::Bool], TExp::Bool));
        map.insert(PrimOp::Eq, binary_pred.clone());
        map.insert(PrimOp::StringEq, binary_pred);
        map.insert(PrimOp::Display, TExp::proc(vec![TExp::tvar("T")], TExp::Void));
        map.insert(PrimOp::Newline, TExp::proc(vec![], TExp::Void));
        map
    })
}

/// The declared signature of `op`, if it has one.
pub fn primitive_signature(op: PrimOp) -> Option<&'static TExp> {
    primitive_type_lookup().get(&op)
}
