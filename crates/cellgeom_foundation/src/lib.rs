//! Errors, analytic surfaces, and the surface registry for cellgeom.
//!
//! This crate provides:
//! - [`Error`] - Rich error types shared by every layer
//! - [`Surface`] - Analytic surface primitives (plane, sphere, cylinder,
//!   cone, general quadric) with side classification and line intersection
//! - [`SurfaceRegistry`] - The explicit number-to-surface map the rule
//!   engine resolves signed literals against

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod registry;
pub mod surface;

pub use error::{Error, ErrorKind, Result};
pub use registry::SurfaceRegistry;
pub use surface::{SURF_TOL, Side, Surface};
