//! Tuplet Benchmarks
//!
//! Performance benchmarks for the Tuplet type checker and evaluator.
//! Run with: cargo bench -p tuplet-benchmarks
//!
//! The benchmarks share the program generators below so both measure the
//! same shapes of source text.

/// `count` procedure definitions, each returning a two-element tuple, and a
/// final expression destructuring every one of them.
pub fn generate_tuple_procedures(count: usize) -> String {
    let mut source = String::new();
    for i in 0..count {
        source.push_str(&format!(
            "(define (split_{i} : (number -> (number * boolean)))\n  \
             (lambda ((n : number)) : (number * boolean) (values (+ n {i}) (> n {i}))))\n"
        ));
    }
    source.push_str("(let-values (");
    for i in 0..count {
        source.push_str(&format!(
            "(((a_{i} : number) (b_{i} : boolean)) (split_{i} {i})) "
        ));
    }
    let mut sum = "0".to_string();
    for i in 0..count {
        sum = format!("(+ (if b_{i} a_{i} 0) {sum})");
    }
    source.push_str(&format!(")\n  {sum})\n"));
    source
}

/// let-values nested `depth` levels deep, each level shadowing the
/// previous names.
pub fn generate_nested_let_values(depth: usize) -> String {
    let mut source = String::new();
    for _ in 0..depth {
        source.push_str("(let-values ((((x : number) (y : number)) (values 1 2))) ");
    }
    source.push_str("(+ x y)");
    for _ in 0..depth {
        source.push(')');
    }
    source
}

/// A single tuple `width` elements wide, destructured in one group.
pub fn generate_wide_tuple(width: usize) -> String {
    let pattern: Vec<String> = (0..width).map(|i| format!("(v{i} : number)")).collect();
    let values: Vec<String> = (0..width).map(|i| i.to_string()).collect();
    format!(
        "(let-values ((({}) (values {}))) v0)",
        pattern.join(" "),
        values.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_programs_type_check() {
        let checker = tuplet_types::TypeChecker::new();
        for source in [
            generate_tuple_procedures(5),
            generate_nested_let_values(5),
            generate_wide_tuple(8),
        ] {
            let program = tuplet_parser::parse_program(&source).expect("parse failed");
            assert!(checker.check_program(&program).is_ok(), "{}", source);
        }
    }
}
