//! Integration tests for ray/surface tracking through a HeadRule
//!
//! Tests nearest-crossing selection, the sign convention, tie-breaking,
//! and segment validity.

use cellgeom::rule::HeadRule;
use nalgebra::{Point3, Vector3};

use crate::fixture_registry;

fn box_rule() -> HeadRule {
    HeadRule::parse("1 -2 3 -4 5 -6").unwrap()
}

// =============================================================================
// Nearest Crossing
// =============================================================================

#[test]
fn nearest_boundary_wins() {
    let reg = fixture_registry();
    let rule = box_rule();
    // From x = 0.5 along +x the near face is surface 2 at distance 0.5.
    let c = rule
        .track_surf_intersect(&Point3::new(0.5, 0.0, 0.0), &Vector3::x(), &reg)
        .unwrap()
        .unwrap();
    assert_eq!(c.surface.abs(), 2);
    assert!((c.distance - 0.5).abs() < 1e-9);
}

#[test]
fn direction_need_not_be_normalized() {
    let reg = fixture_registry();
    let rule = box_rule();
    let fast = rule
        .track_surf_distance(&Point3::origin(), &Vector3::new(10.0, 0.0, 0.0), &reg)
        .unwrap()
        .unwrap();
    // Distances are along the unit direction.
    assert!((fast.1 - 1.0).abs() < 1e-9);
}

#[test]
fn crossing_sign_reports_the_side_entered() {
    let reg = fixture_registry();
    let rule = HeadRule::parse("-7").unwrap();
    // Leaving the unit sphere outward enters the positive side.
    let out = rule
        .track_surf(&Point3::origin(), &Vector3::x(), &reg)
        .unwrap()
        .unwrap();
    assert_eq!(out, 7);
    // Entering from outside lands on the negative side.
    let inward = rule
        .track_surf(
            &Point3::new(3.0, 0.0, 0.0),
            &Vector3::new(-1.0, 0.0, 0.0),
            &reg,
        )
        .unwrap()
        .unwrap();
    assert_eq!(inward, -7);
}

#[test]
fn non_flipping_crossings_are_skipped() {
    let reg = fixture_registry();
    // The union of both x half-spaces is true on both sides of surface 1,
    // so crossing plane x = -1 never flips validity.
    let rule = HeadRule::parse("1:-1").unwrap();
    let c = rule
        .track_surf_intersect(&Point3::new(-3.0, 0.0, 0.0), &Vector3::x(), &reg)
        .unwrap();
    assert!(c.is_none());
}

#[test]
fn coincident_crossings_pick_lowest_surface_number() {
    let reg = fixture_registry();
    // The sphere and the plane x = 1 both sit at distance 1 from the
    // origin along +x; leaving "inside both" flips at either.
    let rule = HeadRule::parse("-2 -7").unwrap();
    let c = rule
        .track_surf_intersect(&Point3::origin(), &Vector3::x(), &reg)
        .unwrap()
        .unwrap();
    assert_eq!(c.surface.abs(), 2);
}

#[test]
fn empty_rule_never_crosses() {
    let reg = fixture_registry();
    let none = HeadRule::new()
        .track_surf_intersect(&Point3::origin(), &Vector3::x(), &reg)
        .unwrap();
    assert!(none.is_none());
}

#[test]
fn crossing_at_the_origin_is_ignored() {
    let reg = fixture_registry();
    let rule = box_rule();
    // Standing exactly on the y = -1 face looking inward: the coincident
    // crossing at t = 0 is skipped, the next flip is y = 1 at t = 2.
    let c = rule
        .track_surf_intersect(&Point3::new(0.0, -1.0, 0.0), &Vector3::y(), &reg)
        .unwrap()
        .unwrap();
    assert_eq!(c.surface.abs(), 4);
    assert!((c.distance - 2.0).abs() < 1e-9);
}

// =============================================================================
// Derived Queries
// =============================================================================

#[test]
fn track_point_lands_on_the_boundary() {
    let reg = fixture_registry();
    let p = box_rule()
        .track_point(&Point3::origin(), &Vector3::z(), &reg)
        .unwrap()
        .unwrap();
    assert!((p.z - 1.0).abs() < 1e-9);
}

#[test]
fn closest_point_selects_among_candidates() {
    let reg = fixture_registry();
    let candidates = [
        Point3::new(0.0, 0.0, 5.0),
        Point3::new(0.1, 0.0, 1.0),
        Point3::new(-4.0, 0.0, 0.0),
    ];
    let chosen = box_rule()
        .track_closest_point(&Point3::origin(), &Vector3::z(), &candidates, &reg)
        .unwrap()
        .unwrap();
    assert_eq!(chosen, candidates[1]);
}

#[test]
fn closest_surface_uses_distance_estimate() {
    let reg = fixture_registry();
    let rule = box_rule();
    let near = rule
        .track_closest_surface(&Point3::new(0.95, 0.0, 0.0), &reg)
        .unwrap()
        .unwrap();
    assert_eq!(near, 2);
}

// =============================================================================
// Segment Validity
// =============================================================================

#[test]
fn segment_through_a_notch_is_invalid() {
    let reg = fixture_registry();
    // Box minus the central sphere: the straight path between two valid
    // corners dips through the hole.
    let mut shell = box_rule();
    shell -= &HeadRule::parse("-7").unwrap();
    let a = Point3::new(-0.9, -0.9, 0.0);
    let b = Point3::new(0.9, 0.9, 0.0);
    assert!(shell.is_valid(&a, &reg).unwrap());
    assert!(shell.is_valid(&b, &reg).unwrap());
    assert!(!shell.is_line_valid(&a, &b, &reg).unwrap());
    // An edge-hugging chord stays clear of the unit sphere.
    let c = Point3::new(-0.9, 0.9, 0.9);
    let d = Point3::new(0.9, 0.9, 0.9);
    assert!(shell.is_line_valid(&c, &d, &reg).unwrap());
}

#[test]
fn degenerate_segment_reduces_to_point_validity() {
    let reg = fixture_registry();
    let p = Point3::new(0.2, 0.2, 0.2);
    assert!(box_rule().is_line_valid(&p, &p, &reg).unwrap());
}
