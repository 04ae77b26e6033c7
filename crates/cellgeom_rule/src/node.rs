//! The binary rule tree.
//!
//! A [`RuleNode`] mirrors the boolean semantics of the algebra crate's
//! `Expr`, but as a strict binary tree with unique ownership: cheap to
//! grow one term at a time, cheap to walk for geometric evaluation, and
//! trivially editable without a normalization pass. The legacy design
//! dispatched these three shapes through virtual inheritance; the variant
//! set is fixed, so a closed tagged enum replaces it.

use std::collections::HashMap;

use nalgebra::Point3;

use cellgeom_algebra::Expr;
use cellgeom_foundation::{Result, SurfaceRegistry};

/// One node of a cell's boolean rule tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleNode {
    /// Leaf: a signed surface literal (never zero).
    Surf(i32),
    /// Intersection of exactly two subtrees.
    Inter(Box<RuleNode>, Box<RuleNode>),
    /// Union of exactly two subtrees.
    Union(Box<RuleNode>, Box<RuleNode>),
}

impl RuleNode {
    /// Evaluates "is the point inside the region" against registered
    /// surfaces. Both children of an internal node are always evaluated,
    /// so an unresolved surface anywhere in the tree is reported.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface number.
    pub fn is_valid(&self, point: &Point3<f64>, registry: &SurfaceRegistry) -> Result<bool> {
        match self {
            Self::Surf(n) => registry.side_of(*n, point),
            Self::Inter(l, r) => {
                let lv = l.is_valid(point, registry)?;
                let rv = r.is_valid(point, registry)?;
                Ok(lv && rv)
            }
            Self::Union(l, r) => {
                let lv = l.is_valid(point, registry)?;
                let rv = r.is_valid(point, registry)?;
                Ok(lv || rv)
            }
        }
    }

    /// Like [`RuleNode::is_valid`], but truth for surfaces present in
    /// `overrides` (keyed by absolute number, value = "on positive side")
    /// is taken from the map instead of the geometry. Used to test
    /// hypothetical sign flips without touching any surface.
    ///
    /// # Errors
    /// Returns an error for an unregistered, non-overridden surface.
    pub fn is_valid_signed(
        &self,
        point: &Point3<f64>,
        overrides: &HashMap<i32, bool>,
        registry: &SurfaceRegistry,
    ) -> Result<bool> {
        match self {
            Self::Surf(n) => match overrides.get(&n.abs()) {
                Some(&positive) => Ok(if *n > 0 { positive } else { !positive }),
                None => registry.side_of(*n, point),
            },
            Self::Inter(l, r) => {
                let lv = l.is_valid_signed(point, overrides, registry)?;
                let rv = r.is_valid_signed(point, overrides, registry)?;
                Ok(lv && rv)
            }
            Self::Union(l, r) => {
                let lv = l.is_valid_signed(point, overrides, registry)?;
                let rv = r.is_valid_signed(point, overrides, registry)?;
                Ok(lv || rv)
            }
        }
    }

    /// De Morgan complement in place: Inter and Union swap, every leaf
    /// literal negates.
    pub fn make_complement(&mut self) {
        let node = std::mem::replace(self, placeholder());
        *self = node.into_complement();
    }

    fn into_complement(self) -> RuleNode {
        match self {
            Self::Surf(n) => Self::Surf(-n),
            Self::Inter(l, r) => {
                Self::Union(Box::new(l.into_complement()), Box::new(r.into_complement()))
            }
            Self::Union(l, r) => {
                Self::Inter(Box::new(l.into_complement()), Box::new(r.into_complement()))
            }
        }
    }

    /// Collects the signed leaf literals in left-to-right order.
    pub fn collect_surfaces(&self, out: &mut Vec<i32>) {
        match self {
            Self::Surf(n) => out.push(*n),
            Self::Inter(l, r) | Self::Union(l, r) => {
                l.collect_surfaces(out);
                r.collect_surfaces(out);
            }
        }
    }

    /// Removes every leaf referencing the surface (by absolute number),
    /// collapsing internal nodes left with a single child. Returns `None`
    /// if the whole tree vanishes.
    #[must_use]
    pub fn remove_surf(self, number: i32) -> Option<RuleNode> {
        match self {
            Self::Surf(n) => (n.abs() != number.abs()).then_some(Self::Surf(n)),
            Self::Inter(l, r) => join(l.remove_surf(number), r.remove_surf(number), true),
            Self::Union(l, r) => join(l.remove_surf(number), r.remove_surf(number), false),
        }
    }

    /// Replaces references to surface `old` with surface `new`, preserving
    /// each leaf's polarity relative to `old`'s sign: with `old = 3`,
    /// `new = 7`, leaf `+3` becomes `+7` and `-3` becomes `-7`; passing
    /// `old` or `new` negated flips the mapping.
    pub fn substitute_surf(&mut self, old: i32, new: i32) {
        match self {
            Self::Surf(n) => {
                if n.abs() == old.abs() {
                    *n = if (*n > 0) == (old > 0) { new } else { -new };
                }
            }
            Self::Inter(l, r) | Self::Union(l, r) => {
                l.substitute_surf(old, new);
                r.substitute_surf(old, new);
            }
        }
    }

    /// Keeps only the branches that mention the surface (by absolute
    /// number). A child subtree mentioning it anywhere is kept whole,
    /// sibling terms included; a child that never mentions it is dropped,
    /// and an internal node with one surviving child collapses.
    #[must_use]
    pub fn isolate_surf(self, number: i32) -> Option<RuleNode> {
        match self {
            Self::Surf(n) => (n.abs() == number.abs()).then_some(Self::Surf(n)),
            Self::Inter(l, r) => {
                let l = l.mentions(number).then_some(*l);
                let r = r.mentions(number).then_some(*r);
                join(l, r, true)
            }
            Self::Union(l, r) => {
                let l = l.mentions(number).then_some(*l);
                let r = r.mentions(number).then_some(*r);
                join(l, r, false)
            }
        }
    }

    /// Whether any leaf references the surface (by absolute number).
    #[must_use]
    pub fn mentions(&self, number: i32) -> bool {
        match self {
            Self::Surf(n) => n.abs() == number.abs(),
            Self::Inter(l, r) | Self::Union(l, r) => {
                l.mentions(number) || r.mentions(number)
            }
        }
    }

    /// Converts to the n-ary normalized algebra representation.
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Surf(n) => Expr::Lit(*n),
            Self::Inter(l, r) => Expr::and(vec![l.to_expr(), r.to_expr()]),
            Self::Union(l, r) => Expr::or(vec![l.to_expr(), r.to_expr()]),
        }
    }

    /// Builds a right-leaning binary tree from an algebra expression.
    /// Constant subexpressions fold out along the way: an identity child
    /// (a tautology under an intersection, a contradiction under a union)
    /// drops, while an annihilating child (a contradiction under an
    /// intersection, a tautology under a union) decides the whole node.
    /// An expression that folds to a constant has no tree and is reported
    /// as [`Folded::AlwaysTrue`] or [`Folded::AlwaysFalse`].
    #[must_use]
    pub fn from_expr(expr: &Expr) -> Folded {
        match expr {
            Expr::Lit(n) => Folded::Node(Self::Surf(*n)),
            Expr::And(children) => fold_binary(children, true),
            Expr::Or(children) => fold_binary(children, false),
        }
    }
}

/// Outcome of lowering an algebra expression into a binary tree.
///
/// The tree has no leaf for "always" or "never", so constant expressions
/// are reported alongside real trees rather than silently collapsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Folded {
    /// The expression lowered to a real tree.
    Node(RuleNode),
    /// The expression is true everywhere (the empty intersection).
    AlwaysTrue,
    /// The expression is false everywhere (the empty union).
    AlwaysFalse,
}

/// A throwaway node used only while re-linking children in place.
fn placeholder() -> RuleNode {
    RuleNode::Surf(i32::MAX)
}

fn join(l: Option<RuleNode>, r: Option<RuleNode>, intersection: bool) -> Option<RuleNode> {
    match (l, r) {
        (Some(l), Some(r)) => Some(if intersection {
            RuleNode::Inter(Box::new(l), Box::new(r))
        } else {
            RuleNode::Union(Box::new(l), Box::new(r))
        }),
        (Some(one), None) | (None, Some(one)) => Some(one),
        (None, None) => None,
    }
}

fn fold_binary(children: &[Expr], intersection: bool) -> Folded {
    let mut nodes: Vec<RuleNode> = Vec::with_capacity(children.len());
    for child in children {
        match RuleNode::from_expr(child) {
            Folded::Node(node) => nodes.push(node),
            Folded::AlwaysTrue => {
                if !intersection {
                    return Folded::AlwaysTrue;
                }
            }
            Folded::AlwaysFalse => {
                if intersection {
                    return Folded::AlwaysFalse;
                }
            }
        }
    }
    let Some(mut acc) = nodes.pop() else {
        return if intersection {
            Folded::AlwaysTrue
        } else {
            Folded::AlwaysFalse
        };
    };
    while let Some(node) = nodes.pop() {
        acc = if intersection {
            RuleNode::Inter(Box::new(node), Box::new(acc))
        } else {
            RuleNode::Union(Box::new(node), Box::new(acc))
        };
    }
    Folded::Node(acc)
}
