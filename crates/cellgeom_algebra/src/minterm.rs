//! Bit-vector minterm representation and Quine-McCluskey reduction.
//!
//! The minimizer works on an explicit arena of fixed-width implicants
//! rather than on expression nodes: bit `i` of an implicant corresponds to
//! variable `i` of an ordered literal universe supplied by the caller.
//! Enumeration is `2^N` in the universe size, so [`MAX_MINTERM_VARS`]
//! bounds `N` and the bound is enforced before any enumeration begins.

use std::collections::HashMap;

use cellgeom_foundation::{Error, Result};

use crate::expr::Expr;

/// Ceiling on the distinct-literal count accepted for truth-table
/// enumeration. Component cells stay well under this in practice.
pub const MAX_MINTERM_VARS: usize = 20;

/// A product term over the variable universe.
///
/// `mask` bit set = the variable is cared about; `value` gives the
/// required polarity for cared bits. A combined (dash) position has its
/// mask bit cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Implicant {
    /// Required variable polarities (only cared bits are meaningful).
    pub value: u32,
    /// Cared-variable mask.
    pub mask: u32,
}

impl Implicant {
    /// A full minterm: every universe variable cared.
    #[must_use]
    pub fn minterm(value: u32, n_vars: usize) -> Self {
        Self {
            value,
            mask: full_mask(n_vars),
        }
    }

    /// Returns whether this implicant covers the given minterm.
    #[must_use]
    pub fn covers(&self, minterm: u32) -> bool {
        (minterm ^ self.value) & self.mask == 0
    }

    /// Attempts the Quine-McCluskey adjacency combination: two implicants
    /// with identical masks differing in exactly one cared bit merge into
    /// one implicant with that bit uncared.
    #[must_use]
    pub fn combine(&self, other: &Implicant) -> Option<Implicant> {
        if self.mask != other.mask {
            return None;
        }
        let diff = (self.value ^ other.value) & self.mask;
        if diff.count_ones() != 1 {
            return None;
        }
        Some(Implicant {
            value: self.value & !diff,
            mask: self.mask & !diff,
        })
    }
}

fn full_mask(n_vars: usize) -> u32 {
    if n_vars >= 32 {
        u32::MAX
    } else {
        (1u32 << n_vars) - 1
    }
}

/// Enumerates the minterms (as variable bit patterns) for which the
/// expression is true, over the given absolute-literal universe. Bit `i`
/// set means universe variable `i` is on its positive side.
///
/// # Errors
/// Returns a limit error if the universe exceeds [`MAX_MINTERM_VARS`], or
/// an unassigned-literal error if the expression mentions a literal
/// outside the universe.
pub fn truth_minterms(expr: &Expr, universe: &[i32]) -> Result<Vec<u32>> {
    if universe.len() > MAX_MINTERM_VARS {
        return Err(Error::limit_exceeded(universe.len(), MAX_MINTERM_VARS));
    }
    let mut minterms = Vec::new();
    let mut assignment = HashMap::with_capacity(universe.len());
    for bits in 0u32..(1u32 << universe.len()) {
        assignment.clear();
        for (i, &var) in universe.iter().enumerate() {
            assignment.insert(var, bits & (1 << i) != 0);
        }
        if expr.eval(&assignment)? {
            minterms.push(bits);
        }
    }
    Ok(minterms)
}

/// Computes all prime implicants of a minterm set by iterated adjacent
/// combination until no further merge is possible.
#[must_use]
pub fn prime_implicants(minterms: &[u32], n_vars: usize) -> Vec<Implicant> {
    let mut current: Vec<Implicant> = minterms
        .iter()
        .map(|&m| Implicant::minterm(m, n_vars))
        .collect();
    let mut primes = Vec::new();

    while !current.is_empty() {
        let mut combined = vec![false; current.len()];
        let mut next: Vec<Implicant> = Vec::new();
        for i in 0..current.len() {
            for j in (i + 1)..current.len() {
                if let Some(merged) = current[i].combine(&current[j]) {
                    combined[i] = true;
                    combined[j] = true;
                    if !next.contains(&merged) {
                        next.push(merged);
                    }
                }
            }
        }
        for (implicant, was_combined) in current.iter().zip(&combined) {
            if !was_combined && !primes.contains(implicant) {
                primes.push(*implicant);
            }
        }
        current = next;
    }
    primes
}

/// Selects a covering subset of the prime implicants: essential primes
/// first (sole cover of some minterm), then a greedy cover of the
/// remainder (most minterms covered wins, ties to the lower index).
#[must_use]
pub fn essential_cover(primes: &[Implicant], minterms: &[u32]) -> Vec<Implicant> {
    let mut chosen: Vec<usize> = Vec::new();
    let mut remaining: Vec<u32> = minterms.to_vec();

    // Essential primes.
    for &m in minterms {
        let covering: Vec<usize> = primes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.covers(m))
            .map(|(i, _)| i)
            .collect();
        if let [only] = covering[..] {
            if !chosen.contains(&only) {
                chosen.push(only);
            }
        }
    }
    remaining.retain(|&m| !chosen.iter().any(|&i| primes[i].covers(m)));

    // Greedy cover of the rest.
    while !remaining.is_empty() {
        let mut best: Option<(usize, usize)> = None;
        for (i, p) in primes.iter().enumerate() {
            if chosen.contains(&i) {
                continue;
            }
            let count = remaining.iter().filter(|&&m| p.covers(m)).count();
            if count > 0 && best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((i, count));
            }
        }
        let Some((pick, _)) = best else {
            // Primes always cover their own minterms, so this is
            // unreachable for well-formed input.
            break;
        };
        chosen.push(pick);
        remaining.retain(|&m| !primes[pick].covers(m));
    }

    chosen.sort_unstable();
    chosen.into_iter().map(|i| primes[i]).collect()
}
