//! End-to-end test on a small shielded-source model
//!
//! A spherical source inside a spherical moderator inside a box shield,
//! built from parsed cell expressions, then queried through every layer:
//! validity, simplification, tracking, and rendering.

use cellgeom::foundation::{Surface, SurfaceRegistry};
use cellgeom::rule::HeadRule;
use cellgeom::track::{Cell, LineTrack, ObjectIndex};
use nalgebra::{Point3, Vector3};

const SOURCE_MAT: i32 = 1;
const MODERATOR_MAT: i32 = 2;
const SHIELD_MAT: i32 = 3;

/// Surface 1: source sphere r = 1. Surface 2: moderator sphere r = 2.
/// Surfaces 11..16: the planes of a 6x6x6 shield box.
fn model() -> (ObjectIndex, SurfaceRegistry) {
    let mut reg = SurfaceRegistry::new();
    reg.register(1, Surface::sphere(Point3::origin(), 1.0)).unwrap();
    reg.register(2, Surface::sphere(Point3::origin(), 2.0)).unwrap();
    reg.register(11, Surface::plane(Vector3::x(), -3.0)).unwrap();
    reg.register(12, Surface::plane(Vector3::x(), 3.0)).unwrap();
    reg.register(13, Surface::plane(Vector3::y(), -3.0)).unwrap();
    reg.register(14, Surface::plane(Vector3::y(), 3.0)).unwrap();
    reg.register(15, Surface::plane(Vector3::z(), -3.0)).unwrap();
    reg.register(16, Surface::plane(Vector3::z(), 3.0)).unwrap();

    let mut index = ObjectIndex::new();
    index
        .insert(Cell::new(1, SOURCE_MAT, HeadRule::parse("-1").unwrap()))
        .unwrap();
    index
        .insert(Cell::new(2, MODERATOR_MAT, HeadRule::parse("1 -2").unwrap()))
        .unwrap();
    index
        .insert(Cell::new(
            3,
            SHIELD_MAT,
            HeadRule::parse("2 11 -12 13 -14 15 -16").unwrap(),
        ))
        .unwrap();
    (index, reg)
}

// =============================================================================
// Containment
// =============================================================================

#[test]
fn each_region_claims_its_points() {
    let (index, reg) = model();
    let at = |x: f64| Point3::new(x, 0.0, 0.0);
    assert_eq!(index.find_cell(&at(0.0), &reg).unwrap().unwrap().id, 1);
    assert_eq!(index.find_cell(&at(1.5), &reg).unwrap().unwrap().id, 2);
    assert_eq!(index.find_cell(&at(2.5), &reg).unwrap().unwrap().id, 3);
    assert!(index.find_cell(&at(4.0), &reg).unwrap().is_none());
}

#[test]
fn regions_do_not_overlap() {
    let (index, reg) = model();
    for x in [0.5, 1.2, 1.9, 2.1, 2.9] {
        let p = Point3::new(x, 0.0, 0.0);
        let claiming = index
            .cells()
            .filter(|c| c.rule.is_valid(&p, &reg).unwrap())
            .count();
        assert_eq!(claiming, 1, "at x = {x}");
    }
}

// =============================================================================
// Tracking Through the Model
// =============================================================================

#[test]
fn radial_ray_sees_source_moderator_shield() {
    let (index, reg) = model();
    let mut track = LineTrack::new(Point3::origin(), Point3::new(5.0, 0.0, 0.0));
    track.calculate(&index, &reg, Some(1)).unwrap();
    assert!(track.escaped());
    let (materials, lengths) = track.material_path();
    assert_eq!(materials, vec![SOURCE_MAT, MODERATOR_MAT, SHIELD_MAT]);
    assert!((lengths[0] - 1.0).abs() < 1e-4);
    assert!((lengths[1] - 1.0).abs() < 1e-4);
    assert!((lengths[2] - 1.0).abs() < 1e-4);
}

#[test]
fn diagonal_ray_exits_through_the_corner_shielding() {
    let (index, reg) = model();
    let corner = Vector3::new(1.0, 1.0, 1.0).normalize();
    let mut track = LineTrack::from_direction(Point3::origin(), corner, 10.0);
    track.calculate(&index, &reg, None).unwrap();
    assert!(track.escaped());
    let (materials, lengths) = track.material_path();
    assert_eq!(materials, vec![SOURCE_MAT, MODERATOR_MAT, SHIELD_MAT]);
    // Corner-ward shielding is thicker than the face-normal meter.
    assert!(lengths[2] > 1.0);
}

#[test]
fn crossing_surfaces_match_the_model_boundaries() {
    let (index, reg) = model();
    let mut track = LineTrack::new(Point3::origin(), Point3::new(2.9, 0.0, 0.0));
    track.calculate(&index, &reg, None).unwrap();
    let exits: Vec<_> = track
        .segments()
        .iter()
        .filter_map(|s| s.surface)
        .map(i32::abs)
        .collect();
    assert_eq!(exits, vec![1, 2]);
}

// =============================================================================
// Rule Algebra on Model Cells
// =============================================================================

#[test]
fn shield_rule_survives_a_render_parse_cycle() {
    let (index, _) = model();
    let shield = &index.cell(3).unwrap().rule;
    let reparsed = HeadRule::parse(&shield.to_string()).unwrap();
    assert!(reparsed.logical_equal(shield).unwrap());
    assert!(!shield.display_fluka().is_empty());
    assert!(!shield.display_povray().is_empty());
}

#[test]
fn union_of_all_cells_contains_every_interior_point() {
    let (index, reg) = model();
    let mut whole = HeadRule::parse("(-11):12").unwrap();
    whole = whole.complement();
    // Everything inside the x slab of the shield box, ignoring the other
    // cuts, is covered by some cell along the x axis.
    for x in [-2.9, -1.5, 0.0, 1.5, 2.9] {
        let p = Point3::new(x, 0.0, 0.0);
        assert!(whole.is_valid(&p, &reg).unwrap());
        assert!(index.find_cell(&p, &reg).unwrap().is_some());
    }
}

#[test]
fn simplifying_a_padded_shield_rule_recovers_the_original() {
    let (index, _) = model();
    let shield = &index.cell(3).unwrap().rule;
    // Intersecting with an absorbed union changes nothing semantically.
    let mut padded = shield.clone();
    padded *= &HeadRule::parse("2:(2 -1)").unwrap();
    let simplified = padded.simplify().unwrap();
    assert!(simplified.logical_equal(shield).unwrap());
}

#[test]
fn moderator_collapses_when_its_outer_sphere_is_removed() {
    let (index, reg) = model();
    let mut moderator = index.cell(2).unwrap().rule.clone();
    moderator.remove_surf(2);
    // Without the outer cut the region extends to the shield.
    assert!(moderator.is_valid(&Point3::new(2.5, 0.0, 0.0), &reg).unwrap());
    assert_eq!(moderator.surface_numbers(), vec![1]);
}
