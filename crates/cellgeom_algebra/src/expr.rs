//! Boolean expression trees over signed surface literals.
//!
//! An [`Expr`] is an alternating tree: an `And` node never has an `And`
//! child and an `Or` node never has an `Or` child. The invariant is
//! enforced by the normalizing constructors [`Expr::and`] and [`Expr::or`],
//! which flatten same-typed children, drop duplicates, sort canonically,
//! and collapse single-child nodes. Canonical form is what makes
//! structural equality meaningful.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use cellgeom_foundation::{Error, Result};

use crate::minterm::MAX_MINTERM_VARS;
use crate::parser;

/// A boolean expression over signed surface literals.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A signed surface literal; never zero.
    Lit(i32),
    /// Intersection of the children. Empty = tautology.
    And(Vec<Expr>),
    /// Union of the children. Empty = contradiction.
    Or(Vec<Expr>),
}

impl Expr {
    /// Parses an MCNP-style cell expression.
    ///
    /// # Errors
    /// Returns a parse error identifying the offending position for
    /// unbalanced parentheses, illegal characters, zero literals, or empty
    /// input.
    pub fn parse(source: &str) -> Result<Self> {
        parser::parse(source)
    }

    /// The always-true expression (empty intersection).
    #[must_use]
    pub fn tautology() -> Self {
        Self::And(Vec::new())
    }

    /// The always-false expression (empty union).
    #[must_use]
    pub fn contradiction() -> Self {
        Self::Or(Vec::new())
    }

    /// Normalizing intersection constructor: flattens nested `And`
    /// children, sorts, deduplicates, and collapses a single child.
    #[must_use]
    pub fn and(children: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Self::And(sub) => flat.extend(sub),
                other => flat.push(other),
            }
        }
        flat.sort_by(canonical_cmp);
        flat.dedup();
        if flat.len() == 1 {
            flat.swap_remove(0)
        } else {
            Self::And(flat)
        }
    }

    /// Normalizing union constructor; dual of [`Expr::and`].
    #[must_use]
    pub fn or(children: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Self::Or(sub) => flat.extend(sub),
                other => flat.push(other),
            }
        }
        flat.sort_by(canonical_cmp);
        flat.dedup();
        if flat.len() == 1 {
            flat.swap_remove(0)
        } else {
            Self::Or(flat)
        }
    }

    /// Combines this expression with another by intersection.
    pub fn intersect_with(&mut self, other: Expr) {
        let current = std::mem::replace(self, Expr::tautology());
        *self = Expr::and(vec![current, other]);
    }

    /// Combines this expression with another by union.
    pub fn union_with(&mut self, other: Expr) {
        let current = std::mem::replace(self, Expr::tautology());
        *self = Expr::or(vec![current, other]);
    }

    /// Returns the De Morgan complement: And and Or swap, every literal
    /// negates.
    #[must_use]
    pub fn complemented(&self) -> Self {
        match self {
            Self::Lit(n) => Self::Lit(-n),
            Self::And(children) => {
                Self::or(children.iter().map(Self::complemented).collect())
            }
            Self::Or(children) => {
                Self::and(children.iter().map(Self::complemented).collect())
            }
        }
    }

    /// De Morgan complement in place.
    pub fn complement(&mut self) {
        *self = self.complemented();
    }

    /// Returns whether this is the empty intersection.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        matches!(self, Self::And(v) if v.is_empty())
    }

    /// Returns whether this is the empty union.
    #[must_use]
    pub fn is_contradiction(&self) -> bool {
        matches!(self, Self::Or(v) if v.is_empty())
    }

    /// Collects the signed literals of the expression, sorted by absolute
    /// value then sign, deduplicated.
    #[must_use]
    pub fn literals(&self) -> Vec<i32> {
        let mut out = Vec::new();
        self.collect_literals(&mut out);
        out.sort_by(|a, b| a.abs().cmp(&b.abs()).then(a.cmp(b)));
        out.dedup();
        out
    }

    /// Collects the absolute literal universe, sorted ascending,
    /// deduplicated.
    #[must_use]
    pub fn abs_literals(&self) -> Vec<i32> {
        let mut out: Vec<i32> = self.literals().iter().map(|n| n.abs()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_literals(&self, out: &mut Vec<i32>) {
        match self {
            Self::Lit(n) => out.push(*n),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_literals(out);
                }
            }
        }
    }

    /// Evaluates the expression under an assignment mapping **absolute**
    /// surface numbers to "on the positive side". A negated literal reads
    /// the inverted entry.
    ///
    /// Every literal in the expression must be assigned: all children are
    /// evaluated (no short-circuit), so a missing entry is reported no
    /// matter where it sits in the tree.
    ///
    /// # Errors
    /// Returns [`cellgeom_foundation::ErrorKind::UnassignedLiteral`] for a
    /// literal absent from the map.
    pub fn eval(&self, assignment: &HashMap<i32, bool>) -> Result<bool> {
        match self {
            Self::Lit(n) => {
                let value = assignment
                    .get(&n.abs())
                    .copied()
                    .ok_or_else(|| Error::unassigned_literal(*n))?;
                Ok(if *n > 0 { value } else { !value })
            }
            Self::And(children) => {
                let mut out = true;
                for child in children {
                    out &= child.eval(assignment)?;
                }
                Ok(out)
            }
            Self::Or(children) => {
                let mut out = false;
                for child in children {
                    out |= child.eval(assignment)?;
                }
                Ok(out)
            }
        }
    }

    /// Tests propositional equivalence by truth-table comparison over the
    /// union of both literal universes. Two differently-shaped trees can be
    /// logically equal.
    ///
    /// # Errors
    /// Returns a limit error if the combined universe exceeds
    /// [`MAX_MINTERM_VARS`].
    pub fn logical_equal(&self, other: &Expr) -> Result<bool> {
        let mut universe = self.abs_literals();
        universe.extend(other.abs_literals());
        universe.sort_unstable();
        universe.dedup();
        if universe.len() > MAX_MINTERM_VARS {
            return Err(Error::limit_exceeded(universe.len(), MAX_MINTERM_VARS));
        }

        let mut assignment = HashMap::with_capacity(universe.len());
        for bits in 0u32..(1u32 << universe.len()) {
            assignment.clear();
            for (i, &var) in universe.iter().enumerate() {
                assignment.insert(var, bits & (1 << i) != 0);
            }
            if self.eval(&assignment)? != other.eval(&assignment)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Canonical child ordering: literals first (by absolute value, then
/// sign), then And subtrees, then Or subtrees, recursively.
fn canonical_cmp(a: &Expr, b: &Expr) -> Ordering {
    match (a, b) {
        (Expr::Lit(x), Expr::Lit(y)) => x.abs().cmp(&y.abs()).then(x.cmp(y)),
        (Expr::Lit(_), _) => Ordering::Less,
        (_, Expr::Lit(_)) => Ordering::Greater,
        (Expr::And(x), Expr::And(y)) | (Expr::Or(x), Expr::Or(y)) => {
            for (cx, cy) in x.iter().zip(y.iter()) {
                let ord = canonical_cmp(cx, cy);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Expr::And(_), Expr::Or(_)) => Ordering::Less,
        (Expr::Or(_), Expr::And(_)) => Ordering::Greater,
    }
}

impl fmt::Display for Expr {
    /// Renders the canonical MCNP form: adjacency for intersection, `:`
    /// for union, parentheses only where a union sits inside an
    /// intersection. Round-trips through [`Expr::parse`] up to logical
    /// equality.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, false)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, expr: &Expr, inside_and: bool) -> fmt::Result {
    match expr {
        Expr::Lit(n) => write!(f, "{n}"),
        Expr::And(children) => {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write_node(f, child, true)?;
            }
            Ok(())
        }
        Expr::Or(children) => {
            if inside_and {
                write!(f, "(")?;
            }
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, ":")?;
                }
                write_node(f, child, false)?;
            }
            if inside_and {
                write!(f, ")")?;
            }
            Ok(())
        }
    }
}
