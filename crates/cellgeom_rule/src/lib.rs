//! Binary rule tree and the `HeadRule` facade.
//!
//! This crate provides:
//! - [`RuleNode`] - A closed Leaf/Intersection/Union tagged variant with
//!   exactly two children per internal node, optimized for incremental
//!   mutation and direct geometric evaluation
//! - [`HeadRule`] - The public facade components use: boolean combinators
//!   with an explicit empty ("no constraint") state, point and segment
//!   validity, ray/surface tracking, structural edits, and MCNP, FLUKA,
//!   and POV-Ray rendering of one underlying tree
//!
//! Boolean minimization lives in `cellgeom_algebra`; the facade bridges to
//! it through a lossless tree conversion.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod headrule;
pub mod node;
pub mod render;

pub use headrule::{Crossing, HeadRule, TRACK_TOL};
pub use node::{Folded, RuleNode};
