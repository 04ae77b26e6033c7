//! Cellgeom - CSG half-space rule engine for particle-transport geometry
//!
//! This crate re-exports all layers of the Cellgeom system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: cellgeom_track      — Cells, object index, line tracking
//! Layer 2: cellgeom_rule       — HeadRule facade, binary rule tree, renderers
//! Layer 1: cellgeom_algebra    — Expression tree, parser, DNF/CNF minimizer
//! Layer 0: cellgeom_foundation — Surfaces, registry, Error
//! ```

pub use cellgeom_algebra as algebra;
pub use cellgeom_foundation as foundation;
pub use cellgeom_rule as rule;
pub use cellgeom_track as track;
