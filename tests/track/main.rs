//! Integration tests for Layer 3: Track
//!
//! Tests for the object index and straight-ray material tracking.


use cellgeom::foundation::{Surface, SurfaceRegistry};
use cellgeom::rule::HeadRule;
use cellgeom::track::{Cell, ObjectIndex};
use nalgebra::Vector3;

/// A stack of `n` unit slabs along x starting at x = 0; slab `i` is cell
/// `i` with material `i`.
pub fn slab_stack(n: i32) -> (ObjectIndex, SurfaceRegistry) {
    let mut reg = SurfaceRegistry::new();
    for i in 0..=n {
        reg.register(i + 1, Surface::plane(Vector3::x(), f64::from(i)))
            .unwrap();
    }
    let mut index = ObjectIndex::new();
    for i in 1..=n {
        let rule = HeadRule::parse(&format!("{i} -{}", i + 1)).unwrap();
        index.insert(Cell::new(i, i, rule)).unwrap();
    }
    (index, reg)
}
