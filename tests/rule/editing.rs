//! Integration tests for HeadRule structural edits
//!
//! Tests removal, substitution, isolation, plane matching, and the
//! simplifier.

use cellgeom::rule::HeadRule;
use nalgebra::{Point3, Vector3};

use crate::fixture_registry;

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_surf_drops_both_polarities() {
    let mut rule = HeadRule::parse("1 -2 (2:3)").unwrap();
    rule.remove_surf(2);
    assert_eq!(rule.surface_numbers(), vec![1, 3]);
}

#[test]
fn removing_every_surface_leaves_the_empty_rule() {
    let mut rule = HeadRule::parse("1 -1").unwrap();
    rule.remove_surf(1);
    assert!(rule.is_empty());
}

#[test]
fn isolate_keeps_only_mentioning_branches() {
    let mut rule = HeadRule::parse("(1 2):(3 4)").unwrap();
    rule.isolate_surf(3);
    assert_eq!(rule.surface_numbers(), vec![3, 4]);
}

// =============================================================================
// Substitution
// =============================================================================

#[test]
fn substitution_preserves_relative_polarity() {
    // Parsing canonicalizes "2 -2" to "-2 2".
    let mut rule = HeadRule::parse("2 -2").unwrap();
    rule.substitute_surf(2, 9);
    assert_eq!(rule.to_string(), "-9 9");
    // Asking for the old number's negation maps signs the other way.
    let mut flipped = HeadRule::parse("2 -2").unwrap();
    flipped.substitute_surf(-2, 9);
    assert_eq!(flipped.to_string(), "9 -9");
}

#[test]
fn substitution_changes_geometry() {
    let reg = fixture_registry();
    let mut rule = HeadRule::parse("1 -2").unwrap();
    // Swap the x = 1 cut for the y = 1 plane.
    rule.substitute_surf(2, 4);
    assert!(rule.is_valid(&Point3::new(4.0, 0.0, 0.0), &reg).unwrap());
    assert!(!rule.is_valid(&Point3::new(0.0, 4.0, 0.0), &reg).unwrap());
}

// =============================================================================
// Plane Matching
// =============================================================================

#[test]
fn matched_plane_removal_is_axis_selective() {
    let reg = fixture_registry();
    let mut rule = HeadRule::parse("1 -2 3 -4 5 -6").unwrap();
    let removed = rule
        .remove_matched_planes(&Vector3::z(), 1e-6, &reg)
        .unwrap();
    assert_eq!(removed, vec![5, 6]);
    assert_eq!(rule.surface_numbers(), vec![1, 2, 3, 4]);
}

#[test]
fn matched_plane_removal_ignores_spheres() {
    let reg = fixture_registry();
    let mut rule = HeadRule::parse("-7").unwrap();
    let removed = rule
        .remove_matched_planes(&Vector3::x(), 1e-6, &reg)
        .unwrap();
    assert!(removed.is_empty());
    assert_eq!(rule.surface_numbers(), vec![7]);
}

#[test]
fn outer_plane_depends_on_the_origin() {
    let reg = fixture_registry();
    // Seen from x = 3, the farthest x-cut along -x is surface 1.
    let mut rule = HeadRule::parse("1 -2").unwrap();
    let removed = rule
        .remove_outer_plane(&Point3::new(3.0, 0.0, 0.0), &Vector3::new(-1.0, 0.0, 0.0), 1e-6, &reg)
        .unwrap();
    assert_eq!(removed, Some(1));
}

// =============================================================================
// Simplification
// =============================================================================

#[test]
fn simplify_removes_absorbed_terms() {
    let rule = HeadRule::parse("(1 2):1").unwrap();
    assert_eq!(rule.simplify().unwrap().to_string(), "1");
}

#[test]
fn simplify_tautology_becomes_empty() {
    let rule = HeadRule::parse("1:-1").unwrap();
    assert!(rule.simplify().unwrap().is_empty());
}

#[test]
fn simplify_contradiction_stays_expressible() {
    let reg = fixture_registry();
    let rule = HeadRule::parse("1 -1 2").unwrap();
    let simple = rule.simplify().unwrap();
    assert!(!simple.is_empty());
    assert!(simple.is_zero_volume().unwrap());
    assert!(!simple.is_valid(&Point3::origin(), &reg).unwrap());
}

#[test]
fn simplify_preserves_meaning() {
    let original = HeadRule::parse("(1:2) (-1:2) (3:-3)").unwrap();
    let simple = original.simplify().unwrap();
    assert!(simple.logical_equal(&original).unwrap());
    assert!(simple.surface_count() <= original.surface_count());
}
