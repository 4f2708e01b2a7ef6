//! Mission generator: template + library in, resolved mission out.

pub mod generation;

pub use facade::*;

mod facade;
