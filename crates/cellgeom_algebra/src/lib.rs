//! Boolean algebra over signed surface literals.
//!
//! This crate provides:
//! - [`Expr`] - Alternating And/Or expression trees over signed integer
//!   literals, with normalization, complement, and truth evaluation
//! - MCNP cell-expression parsing ([`Expr::parse`])
//! - [`make_dnf`] / [`make_cnf`] - Normal forms minimized by
//!   Quine-McCluskey prime-implicant reduction
//!
//! A literal `n` is a propositional variable meaning "the point is on the
//! positive side of surface `|n|`"; a negative literal means the negative
//! side. The algebra is purely propositional: no geometry is consulted
//! here.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod expr;
pub mod minterm;
pub mod normal;
pub mod parser;

pub use expr::Expr;
pub use minterm::{Implicant, MAX_MINTERM_VARS};
pub use normal::{make_cnf, make_dnf};
