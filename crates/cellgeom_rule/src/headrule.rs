//! The `HeadRule` facade.
//!
//! A `HeadRule` owns one rule tree for a single cell/region boundary and
//! is the type the component builders pass around. The empty rule is a
//! first-class state meaning "no constraint": it is valid everywhere and
//! acts as the identity under both union and intersection (one uniform
//! semantic, replacing the call-site-dependent legacy behavior).

use std::collections::HashMap;
use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use nalgebra::{Point3, Vector3};

use cellgeom_algebra::{Expr, make_dnf};
use cellgeom_foundation::{Error, Result, Surface, SurfaceRegistry};

use crate::node::{Folded, RuleNode};
use crate::render;

/// Tolerance used when stepping across surfaces during tracking; a
/// crossing closer than this to the current position is coincident.
pub const TRACK_TOL: f64 = 1e-6;

/// A ray/boundary crossing found by tracking.
#[derive(Clone, Debug, PartialEq)]
pub struct Crossing {
    /// The surface crossed, signed by the side entered: positive if the
    /// defining form is positive just past the crossing.
    pub surface: i32,
    /// The crossing point.
    pub point: Point3<f64>,
    /// Distance along the (normalized) ray direction.
    pub distance: f64,
}

/// A cell boundary expression: one owned rule tree, or empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadRule {
    root: Option<RuleNode>,
}

impl HeadRule {
    /// Creates the empty rule ("no constraint", valid everywhere).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule constraining a single signed surface.
    ///
    /// # Errors
    /// Returns an error for surface number 0.
    pub fn from_surface(signed: i32) -> Result<Self> {
        if signed == 0 {
            return Err(Error::zero_surface());
        }
        Ok(Self {
            root: Some(RuleNode::Surf(signed)),
        })
    }

    /// Parses an MCNP cell expression.
    ///
    /// # Errors
    /// Returns a parse error with position context for malformed input.
    pub fn parse(source: &str) -> Result<Self> {
        let expr = Expr::parse(source)?;
        Ok(Self::from_expr(&expr))
    }

    /// Builds a rule from an algebra expression. A tautology maps to the
    /// empty ("no constraint") rule; a contradiction keeps a minimal
    /// two-leaf `n -n` tree so the always-false region stays distinct
    /// from the empty rule.
    #[must_use]
    pub fn from_expr(expr: &Expr) -> Self {
        match RuleNode::from_expr(expr) {
            Folded::Node(root) => Self { root: Some(root) },
            Folded::AlwaysTrue => Self::new(),
            Folded::AlwaysFalse => {
                let n = expr.abs_literals().first().copied().unwrap_or(1);
                Self {
                    root: Some(RuleNode::Inter(
                        Box::new(RuleNode::Surf(n)),
                        Box::new(RuleNode::Surf(-n)),
                    )),
                }
            }
        }
    }

    /// Converts to the algebra representation; the empty rule is the
    /// tautology.
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        self.root
            .as_ref()
            .map_or_else(Expr::tautology, RuleNode::to_expr)
    }

    /// Returns the owned tree root, if any.
    #[must_use]
    pub fn root(&self) -> Option<&RuleNode> {
        self.root.as_ref()
    }

    /// Returns whether this is the empty rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of (signed, non-deduplicated) surface references in the
    /// tree.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_surfaces(&mut out);
        }
        out.len()
    }

    // ------------------------------------------------------------------
    // Boolean combinators
    // ------------------------------------------------------------------

    /// Unions another rule into this one; empty is the identity on either
    /// side.
    pub fn add_union(&mut self, other: &HeadRule) {
        let Some(other_root) = other.root.clone() else {
            return;
        };
        self.root = Some(match self.root.take() {
            None => other_root,
            Some(root) => RuleNode::Union(Box::new(root), Box::new(other_root)),
        });
    }

    /// Intersects another rule into this one; empty is the identity on
    /// either side.
    pub fn add_intersection(&mut self, other: &HeadRule) {
        let Some(other_root) = other.root.clone() else {
            return;
        };
        self.root = Some(match self.root.take() {
            None => other_root,
            Some(root) => RuleNode::Inter(Box::new(root), Box::new(other_root)),
        });
    }

    /// Intersects the complement of another rule into this one
    /// (difference: A AND NOT B). Subtracting the empty rule is a no-op.
    pub fn add_difference(&mut self, other: &HeadRule) {
        let complement = other.complement();
        self.add_intersection(&complement);
    }

    /// Returns the union of two rules.
    #[must_use]
    pub fn union_of(a: &HeadRule, b: &HeadRule) -> HeadRule {
        let mut out = a.clone();
        out.add_union(b);
        out
    }

    /// Returns the intersection of two rules.
    #[must_use]
    pub fn intersection_of(a: &HeadRule, b: &HeadRule) -> HeadRule {
        let mut out = a.clone();
        out.add_intersection(b);
        out
    }

    /// Returns a complemented copy. The complement of the empty rule is
    /// empty: "no constraint" has no meaningful negation.
    #[must_use]
    pub fn complement(&self) -> HeadRule {
        let mut out = self.clone();
        out.make_complement();
        out
    }

    /// De Morgan complement in place.
    pub fn make_complement(&mut self) {
        if let Some(root) = &mut self.root {
            root.make_complement();
        }
    }

    // ------------------------------------------------------------------
    // Validity queries
    // ------------------------------------------------------------------

    /// Point validity; the empty rule is valid everywhere.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface in the tree.
    pub fn is_valid(&self, point: &Point3<f64>, registry: &SurfaceRegistry) -> Result<bool> {
        match &self.root {
            None => Ok(true),
            Some(root) => root.is_valid(point, registry),
        }
    }

    /// Point validity with per-surface truth overrides (keyed by absolute
    /// number).
    ///
    /// # Errors
    /// Returns an error for an unregistered, non-overridden surface.
    pub fn is_valid_signed(
        &self,
        point: &Point3<f64>,
        overrides: &HashMap<i32, bool>,
        registry: &SurfaceRegistry,
    ) -> Result<bool> {
        match &self.root {
            None => Ok(true),
            Some(root) => root.is_valid_signed(point, overrides, registry),
        }
    }

    /// Segment validity: the whole segment from `a` to `b` must lie in
    /// the region. Checked exactly by splitting the segment at every
    /// surface crossing and testing the midpoint of each piece.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface in the tree.
    pub fn is_line_valid(
        &self,
        a: &Point3<f64>,
        b: &Point3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<bool> {
        if self.root.is_none() {
            return Ok(true);
        }
        let seg = b - a;
        let length = seg.norm();
        if length <= TRACK_TOL {
            return self.is_valid(a, registry);
        }
        let dir = seg / length;

        let mut cuts = vec![0.0, length];
        for number in self.surface_numbers() {
            let surface = registry.get(number)?;
            for t in surface.line_intersect(a, &dir) {
                if t > TRACK_TOL && t < length - TRACK_TOL {
                    cuts.push(t);
                }
            }
        }
        cuts.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

        if !self.is_valid(a, registry)? || !self.is_valid(b, registry)? {
            return Ok(false);
        }
        for pair in cuts.windows(2) {
            let mid = a + dir * (0.5 * (pair[0] + pair[1]));
            if !self.is_valid(&mid, registry)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Ray tracking
    // ------------------------------------------------------------------

    /// Finds the nearest forward crossing of the rule's boundary: the
    /// smallest ray parameter greater than [`TRACK_TOL`] at which
    /// crossing a referenced surface flips the rule's validity. Ties are
    /// broken by the lowest absolute surface number. Returns `None` for
    /// the empty rule, for a degenerate (near-zero) direction, or when
    /// the ray never crosses the boundary.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface in the tree.
    pub fn track_surf_intersect(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<Option<Crossing>> {
        if self.root.is_none() {
            return Ok(None);
        }
        let norm = direction.norm();
        if norm <= TRACK_TOL {
            return Ok(None);
        }
        let dir = direction / norm;
        let mut best: Option<Crossing> = None;

        for number in self.surface_numbers() {
            let surface = registry.get(number)?;
            for t in surface.line_intersect(origin, &dir) {
                if t <= TRACK_TOL {
                    continue;
                }
                let before = origin + dir * (t - TRACK_TOL);
                let after = origin + dir * (t + TRACK_TOL);
                if self.is_valid(&before, registry)? == self.is_valid(&after, registry)? {
                    continue;
                }
                let better = match &best {
                    None => true,
                    Some(b) => {
                        t + TRACK_TOL < b.distance
                            || ((t - b.distance).abs() <= TRACK_TOL
                                && number < b.surface.abs())
                    }
                };
                if better {
                    let signed = if surface.eval(&after) > 0.0 {
                        number
                    } else {
                        -number
                    };
                    best = Some(Crossing {
                        surface: signed,
                        point: origin + dir * t,
                        distance: t,
                    });
                }
            }
        }
        Ok(best)
    }

    /// Nearest forward crossing as a (signed surface, distance) pair.
    ///
    /// # Errors
    /// As [`HeadRule::track_surf_intersect`].
    pub fn track_surf_distance(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<Option<(i32, f64)>> {
        Ok(self
            .track_surf_intersect(origin, direction, registry)?
            .map(|c| (c.surface, c.distance)))
    }

    /// Nearest forward crossing as a bare signed surface number.
    ///
    /// # Errors
    /// As [`HeadRule::track_surf_intersect`].
    pub fn track_surf(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<Option<i32>> {
        Ok(self
            .track_surf_intersect(origin, direction, registry)?
            .map(|c| c.surface))
    }

    /// The point at the first boundary crossing.
    ///
    /// # Errors
    /// As [`HeadRule::track_surf_intersect`].
    pub fn track_point(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<Option<Point3<f64>>> {
        Ok(self
            .track_surf_intersect(origin, direction, registry)?
            .map(|c| c.point))
    }

    /// Among the candidate points, the one closest (by Euclidean
    /// distance) to the ray's first boundary crossing; `None` when the
    /// ray never crosses or no candidates are given.
    ///
    /// # Errors
    /// As [`HeadRule::track_surf_intersect`].
    pub fn track_closest_point(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        candidates: &[Point3<f64>],
        registry: &SurfaceRegistry,
    ) -> Result<Option<Point3<f64>>> {
        let Some(crossing) = self.track_surf_intersect(origin, direction, registry)? else {
            return Ok(None);
        };
        Ok(candidates
            .iter()
            .min_by(|a, b| {
                let da = (*a - crossing.point).norm();
                let db = (*b - crossing.point).norm();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied())
    }

    /// The referenced surface nearest to a point (unsigned number), by
    /// each surface's unsigned distance estimate; ties go to the lower
    /// number.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface in the tree.
    pub fn track_closest_surface(
        &self,
        point: &Point3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<Option<i32>> {
        let mut best: Option<(i32, f64)> = None;
        for number in self.surface_numbers() {
            let d = registry.get(number)?.distance_estimate(point);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((number, d));
            }
        }
        Ok(best.map(|(n, _)| n))
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Absolute surface numbers referenced, sorted ascending,
    /// deduplicated.
    #[must_use]
    pub fn surface_numbers(&self) -> Vec<i32> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_surfaces(&mut out);
        }
        for n in &mut out {
            *n = n.abs();
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Signed surface numbers referenced, sorted by absolute value then
    /// sign, deduplicated.
    #[must_use]
    pub fn signed_surface_numbers(&self) -> Vec<i32> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_surfaces(&mut out);
        }
        out.sort_by(|a, b| a.abs().cmp(&b.abs()).then(a.cmp(b)));
        out.dedup();
        out
    }

    /// Absolute numbers of surfaces appearing with *both* polarities
    /// (sign-paired surfaces, relevant for degeneracy checks).
    #[must_use]
    pub fn opposite_surfaces(&self) -> Vec<i32> {
        let signed = self.signed_surface_numbers();
        signed
            .iter()
            .filter(|&&n| n > 0 && signed.contains(&-n))
            .copied()
            .collect()
    }

    /// Resolves every referenced surface against the registry.
    ///
    /// # Errors
    /// Returns an error naming the first unregistered surface.
    pub fn resolve_surfaces<'r>(
        &self,
        registry: &'r SurfaceRegistry,
    ) -> Result<Vec<(i32, &'r Surface)>> {
        self.surface_numbers()
            .into_iter()
            .map(|n| Ok((n, registry.get(n)?)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Removes every reference to the surface (absolute number),
    /// collapsing degenerate nodes; the rule may become empty.
    pub fn remove_surf(&mut self, number: i32) {
        self.root = self.root.take().and_then(|root| root.remove_surf(number));
    }

    /// Replaces references to surface `old` with `new`, preserving
    /// relative polarity (see [`RuleNode::substitute_surf`]).
    pub fn substitute_surf(&mut self, old: i32, new: i32) {
        if let Some(root) = &mut self.root {
            root.substitute_surf(old, new);
        }
    }

    /// Keeps only the branches mentioning the surface (absolute number).
    pub fn isolate_surf(&mut self, number: i32) {
        self.root = self.root.take().and_then(|root| root.isolate_surf(number));
    }

    /// Removes plane leaves whose normal is parallel or antiparallel to
    /// `axis` within `tol` (of the absolute dot product with the unit
    /// axis). Returns the removed surface numbers.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface in the tree.
    pub fn remove_matched_planes(
        &mut self,
        axis: &Vector3<f64>,
        tol: f64,
        registry: &SurfaceRegistry,
    ) -> Result<Vec<i32>> {
        let matched = self.matched_planes(axis, tol, registry)?;
        for &(number, _) in &matched {
            self.remove_surf(number);
        }
        Ok(matched.into_iter().map(|(n, _)| n).collect())
    }

    /// Removes, among the axis-matched planes, the one farthest from
    /// `origin` along the axis direction (the "outer" cut). Returns the
    /// removed surface number, if any plane matched.
    ///
    /// # Errors
    /// Returns an error for an unregistered surface in the tree.
    pub fn remove_outer_plane(
        &mut self,
        origin: &Point3<f64>,
        axis: &Vector3<f64>,
        tol: f64,
        registry: &SurfaceRegistry,
    ) -> Result<Option<i32>> {
        let unit = axis.normalize();
        let base = unit.dot(&origin.coords);
        let outer = self
            .matched_planes(axis, tol, registry)?
            .into_iter()
            .map(|(n, pos)| (n, pos - base))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(n, _)| n);
        if let Some(number) = outer {
            self.remove_surf(number);
        }
        Ok(outer)
    }

    /// Axis-matched planes with their signed positions along the axis
    /// from the origin.
    fn matched_planes(
        &self,
        axis: &Vector3<f64>,
        tol: f64,
        registry: &SurfaceRegistry,
    ) -> Result<Vec<(i32, f64)>> {
        let unit = axis.normalize();
        let mut out = Vec::new();
        for number in self.surface_numbers() {
            if let Surface::Plane { normal, offset } = registry.get(number)? {
                let align = normal.dot(&unit);
                if align.abs() >= 1.0 - tol {
                    out.push((number, offset / align));
                }
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Simplification and degeneracy
    // ------------------------------------------------------------------

    /// Rebuilds the rule from its minimized DNF. A tautology becomes the
    /// empty rule; a propositional contradiction keeps a minimal
    /// two-leaf `n -n` representation so the always-false region stays
    /// expressible as a tree.
    ///
    /// # Errors
    /// Returns a limit error above the minimization literal ceiling.
    pub fn simplify(&self) -> Result<HeadRule> {
        if self.root.is_none() {
            return Ok(HeadRule::new());
        }
        let expr = self.to_expr();
        let dnf = make_dnf(&expr)?;
        if dnf.is_contradiction() {
            // The minimized form has no literals left; keep one of the
            // original surfaces so the tree stays resolvable.
            let n = expr.abs_literals().first().copied().unwrap_or(1);
            return Ok(HeadRule {
                root: Some(RuleNode::Inter(
                    Box::new(RuleNode::Surf(n)),
                    Box::new(RuleNode::Surf(-n)),
                )),
            });
        }
        Ok(HeadRule::from_expr(&dnf))
    }

    /// Whether the rule is propositionally self-contradictory (a
    /// zero-volume region regardless of the surface geometry). A soft
    /// condition, not an error: degenerate cells are a legitimate
    /// modeling state. Geometric degeneracy from particular surface
    /// placements is not detected here.
    ///
    /// # Errors
    /// Returns a limit error above the minimization literal ceiling.
    pub fn is_zero_volume(&self) -> Result<bool> {
        if self.root.is_none() {
            return Ok(false);
        }
        Ok(make_dnf(&self.to_expr())?.is_contradiction())
    }

    /// Propositional equivalence with another rule.
    ///
    /// # Errors
    /// Returns a limit error above the truth-table literal ceiling.
    pub fn logical_equal(&self, other: &HeadRule) -> Result<bool> {
        self.to_expr().logical_equal(&other.to_expr())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Renders the FLUKA region form of the same tree.
    #[must_use]
    pub fn display_fluka(&self) -> String {
        self.root.as_ref().map_or_else(String::new, render::fluka)
    }

    /// Renders the POV-Ray CSG form of the same tree.
    #[must_use]
    pub fn display_povray(&self) -> String {
        self.root.as_ref().map_or_else(String::new, render::povray)
    }
}

impl fmt::Display for HeadRule {
    /// MCNP cell-card form; the empty rule renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            None => Ok(()),
            Some(root) => write!(f, "{}", render::mcnp(root)),
        }
    }
}

impl AddAssign<&HeadRule> for HeadRule {
    /// Union-combine (`+=`).
    fn add_assign(&mut self, rhs: &HeadRule) {
        self.add_union(rhs);
    }
}

impl MulAssign<&HeadRule> for HeadRule {
    /// Intersection-combine (`*=`).
    fn mul_assign(&mut self, rhs: &HeadRule) {
        self.add_intersection(rhs);
    }
}

impl SubAssign<&HeadRule> for HeadRule {
    /// Difference (`-=`): intersect with the complement.
    fn sub_assign(&mut self, rhs: &HeadRule) {
        self.add_difference(rhs);
    }
}

impl DivAssign<&HeadRule> for HeadRule {
    /// Intersection-with-complement (`/=`); kept as a synonym of `-=`
    /// because builder call sites historically used either spelling.
    fn div_assign(&mut self, rhs: &HeadRule) {
        self.add_difference(rhs);
    }
}
