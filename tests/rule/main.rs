//! Integration tests for Layer 2: Rule
//!
//! Tests for the `HeadRule` facade: boolean combinators, structural
//! edits, ray tracking, and the renderers.

mod editing;
mod tracking;

use cellgeom::foundation::{Surface, SurfaceRegistry};
use nalgebra::{Point3, Vector3};

/// Surfaces 1..6 bound a 2x2x2 box at the origin; 7 is a unit sphere.
pub fn fixture_registry() -> SurfaceRegistry {
    let mut reg = SurfaceRegistry::new();
    reg.register(1, Surface::plane(Vector3::x(), -1.0)).unwrap();
    reg.register(2, Surface::plane(Vector3::x(), 1.0)).unwrap();
    reg.register(3, Surface::plane(Vector3::y(), -1.0)).unwrap();
    reg.register(4, Surface::plane(Vector3::y(), 1.0)).unwrap();
    reg.register(5, Surface::plane(Vector3::z(), -1.0)).unwrap();
    reg.register(6, Surface::plane(Vector3::z(), 1.0)).unwrap();
    reg.register(7, Surface::sphere(Point3::origin(), 1.0)).unwrap();
    reg
}
