//! Shared types for the galaxy evaluator.
//!
//! This crate defines the plain data structures that cross crate
//! boundaries: fully-evaluated data trees, modulated bit sequences,
//! the builtin catalog and picture points.

mod bits;
mod builtin;
mod data;

pub use bits::{Bits, ParseBitsError};
pub use builtin::Builtin;
pub use data::{Data, Point};
