//! The surface registry.
//!
//! Legacy geometry builders resolved surface numbers through a global
//! singleton; here the registry is an explicit value passed by reference
//! into every operation that needs surface resolution, which keeps the rule
//! engine free of hidden state and makes mock surfaces trivial in tests.

use std::collections::BTreeMap;

use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::surface::{Side, Surface};

/// Maps positive surface numbers to analytic surfaces.
///
/// Signed use of a number (`+n` / `-n`) selects one of the two half-spaces
/// the surface divides space into; the registry itself only stores the
/// unsigned entry.
#[derive(Clone, Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<i32, Surface>,
}

impl SurfaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a surface under a positive number.
    ///
    /// # Errors
    /// Returns an error if the number is zero or negative, or already
    /// registered.
    pub fn register(&mut self, number: i32, surface: Surface) -> Result<()> {
        if number <= 0 {
            return Err(Error::zero_surface());
        }
        if self.surfaces.contains_key(&number) {
            return Err(Error::duplicate_surface(number));
        }
        self.surfaces.insert(number, surface);
        Ok(())
    }

    /// Looks up a surface by signed or unsigned number.
    ///
    /// # Errors
    /// Returns an error if the number is zero or unregistered.
    pub fn get(&self, number: i32) -> Result<&Surface> {
        if number == 0 {
            return Err(Error::zero_surface());
        }
        self.surfaces
            .get(&number.abs())
            .ok_or_else(|| Error::unknown_surface(number.abs()))
    }

    /// Returns whether the (unsigned) number is registered.
    #[must_use]
    pub fn contains(&self, number: i32) -> bool {
        self.surfaces.contains_key(&number.abs())
    }

    /// Number of registered surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Iterates registered surface numbers in ascending order.
    pub fn numbers(&self) -> impl Iterator<Item = i32> + '_ {
        self.surfaces.keys().copied()
    }

    /// Tests a signed surface literal at a point: `+n` requires the point
    /// on the positive side, `-n` on the negative side. A point lying on
    /// the surface (within tolerance) satisfies either sign, so validity
    /// stays total on cell boundaries.
    ///
    /// # Errors
    /// Returns an error if the number is zero or unregistered.
    pub fn side_of(&self, signed: i32, point: &Point3<f64>) -> Result<bool> {
        let surface = self.get(signed)?;
        Ok(match surface.side(point) {
            Side::On => true,
            Side::Positive => signed > 0,
            Side::Negative => signed < 0,
        })
    }
}
