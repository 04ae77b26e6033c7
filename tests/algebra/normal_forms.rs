//! Integration tests for DNF/CNF minimization
//!
//! Tests the Quine-McCluskey reduction through the public normal-form
//! entry points.

use std::collections::HashMap;

use cellgeom::algebra::{Expr, MAX_MINTERM_VARS, make_cnf, make_dnf};

fn assignments(universe: &[i32]) -> Vec<HashMap<i32, bool>> {
    let n = universe.len();
    (0u32..1 << n)
        .map(|bits| {
            universe
                .iter()
                .enumerate()
                .map(|(i, &v)| (v, bits & (1 << i) != 0))
                .collect()
        })
        .collect()
}

// =============================================================================
// Truth Preservation
// =============================================================================

#[test]
fn dnf_preserves_truth_on_every_assignment() {
    let expr = Expr::parse("(1:2) (-1:3) (2:-3:4)").unwrap();
    let dnf = make_dnf(&expr).unwrap();
    for assignment in assignments(&expr.abs_literals()) {
        assert_eq!(
            expr.eval(&assignment).unwrap(),
            dnf.eval(&assignment).unwrap()
        );
    }
}

#[test]
fn cnf_preserves_truth_on_every_assignment() {
    let expr = Expr::parse("(1 2):(-1 3):(-2 -3)").unwrap();
    let cnf = make_cnf(&expr).unwrap();
    for assignment in assignments(&expr.abs_literals()) {
        assert_eq!(
            expr.eval(&assignment).unwrap(),
            cnf.eval(&assignment).unwrap()
        );
    }
}

// =============================================================================
// Minimization
// =============================================================================

#[test]
fn absorption_is_eliminated() {
    // 1 : (1 2) minimizes to 1.
    let dnf = make_dnf(&Expr::parse("1:(1 2)").unwrap()).unwrap();
    assert_eq!(dnf, Expr::Lit(1));
}

#[test]
fn complementary_pair_collapses_to_tautology() {
    let dnf = make_dnf(&Expr::parse("1:-1").unwrap()).unwrap();
    assert!(dnf.is_tautology());
}

#[test]
fn contradictory_pair_collapses_to_contradiction() {
    let dnf = make_dnf(&Expr::parse("1 -1").unwrap()).unwrap();
    assert!(dnf.is_contradiction());
}

#[test]
fn dnf_is_a_fixed_point() {
    let expr = Expr::parse("(1:2) (-2:3)").unwrap();
    let once = make_dnf(&expr).unwrap();
    let twice = make_dnf(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn xor_keeps_both_terms() {
    // (1:-2) complemented against (−1:2) has no shorter form than the
    // two-term XOR cover.
    let expr = Expr::parse("(1 -2):(-1 2)").unwrap();
    let dnf = make_dnf(&expr).unwrap();
    for assignment in assignments(&[1, 2]) {
        assert_eq!(
            expr.eval(&assignment).unwrap(),
            dnf.eval(&assignment).unwrap()
        );
    }
    assert!(matches!(dnf, Expr::Or(ref terms) if terms.len() == 2));
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn literal_ceiling_is_enforced() {
    let wide = Expr::and(
        (1..=i32::try_from(MAX_MINTERM_VARS).unwrap() + 1)
            .map(Expr::Lit)
            .collect(),
    );
    let err = make_dnf(&wide).unwrap_err();
    assert!(format!("{err}").contains("limit"));
}

#[test]
fn ceiling_width_is_accepted() {
    let at_limit = Expr::and(
        (1..=i32::try_from(MAX_MINTERM_VARS).unwrap())
            .map(Expr::Lit)
            .collect(),
    );
    let dnf = make_dnf(&at_limit).unwrap();
    assert_eq!(dnf, at_limit);
}
