//! Cells and the object index.

use std::collections::BTreeMap;

use nalgebra::Point3;

use cellgeom_foundation::{Error, Result, SurfaceRegistry};
use cellgeom_rule::HeadRule;

/// A region of space with a material.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Cell id (unique within an [`ObjectIndex`]).
    pub id: i32,
    /// Material id; 0 is void.
    pub material: i32,
    /// The boundary rule; a point is inside the cell iff the rule is
    /// valid there.
    pub rule: HeadRule,
}

impl Cell {
    /// Creates a cell.
    #[must_use]
    pub fn new(id: i32, material: i32, rule: HeadRule) -> Self {
        Self { id, material, rule }
    }
}

/// The simulation's cell set, ordered by cell id.
#[derive(Clone, Debug, Default)]
pub struct ObjectIndex {
    cells: BTreeMap<i32, Cell>,
}

impl ObjectIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell.
    ///
    /// # Errors
    /// Returns an error if the id is already present.
    pub fn insert(&mut self, cell: Cell) -> Result<()> {
        if self.cells.contains_key(&cell.id) {
            return Err(Error::duplicate_cell(cell.id));
        }
        self.cells.insert(cell.id, cell);
        Ok(())
    }

    /// Looks up a cell by id.
    ///
    /// # Errors
    /// Returns an error if the id is unknown.
    pub fn cell(&self, id: i32) -> Result<&Cell> {
        self.cells.get(&id).ok_or_else(|| Error::unknown_cell(id))
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether the index has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates cells in ascending id order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Finds the cell containing a point. Cells are scanned in ascending
    /// id order, so where cells overlap the lowest id wins.
    ///
    /// # Errors
    /// Returns an error if any scanned rule references an unregistered
    /// surface.
    pub fn find_cell(
        &self,
        point: &Point3<f64>,
        registry: &SurfaceRegistry,
    ) -> Result<Option<&Cell>> {
        for cell in self.cells.values() {
            if cell.rule.is_valid(point, registry)? {
                return Ok(Some(cell));
            }
        }
        Ok(None)
    }
}
