//! DNF/CNF construction via prime-implicant minimization.

use cellgeom_foundation::Result;

use crate::expr::Expr;
use crate::minterm::{essential_cover, prime_implicants, truth_minterms};

/// Rebuilds the expression as a minimized disjunctive normal form
/// (sum of products).
///
/// A tautology becomes [`Expr::tautology`] and a contradiction becomes
/// [`Expr::contradiction`]; otherwise the result is the union of the
/// essential-prime cover's product terms. The result is `logical_equal`
/// to the input and the transform is idempotent.
///
/// # Errors
/// Returns a limit error if the expression has more distinct literals
/// than [`crate::MAX_MINTERM_VARS`].
pub fn make_dnf(expr: &Expr) -> Result<Expr> {
    let universe = expr.abs_literals();
    let minterms = truth_minterms(expr, &universe)?;

    let total = 1u64 << universe.len();
    if minterms.len() as u64 == total {
        return Ok(Expr::tautology());
    }
    if minterms.is_empty() {
        return Ok(Expr::contradiction());
    }

    let primes = prime_implicants(&minterms, universe.len());
    let cover = essential_cover(&primes, &minterms);

    let terms = cover
        .iter()
        .map(|implicant| {
            let literals = universe
                .iter()
                .enumerate()
                .filter(|(i, _)| implicant.mask & (1 << i) != 0)
                .map(|(i, &var)| {
                    if implicant.value & (1 << i) != 0 {
                        Expr::Lit(var)
                    } else {
                        Expr::Lit(-var)
                    }
                })
                .collect();
            Expr::and(literals)
        })
        .collect();
    Ok(Expr::or(terms))
}

/// Rebuilds the expression as a minimized conjunctive normal form
/// (product of sums): complement, minimize as DNF, complement back.
///
/// # Errors
/// Same limit as [`make_dnf`].
pub fn make_cnf(expr: &Expr) -> Result<Expr> {
    Ok(make_dnf(&expr.complemented())?.complemented())
}
