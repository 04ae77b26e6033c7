//! Cells, the object index, and straight-ray tracking.
//!
//! This crate provides:
//! - [`Cell`] - A region of space (a `HeadRule`) with a material id
//! - [`ObjectIndex`] - The simulation's id-ordered cell set
//! - [`LineTrack`] - A per-query ray walk recording ordered surface
//!   crossings and per-material path lengths

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cell;
pub mod linetrack;

pub use cell::{Cell, ObjectIndex};
pub use linetrack::{LineTrack, TrackSegment};
