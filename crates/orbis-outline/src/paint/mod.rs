//! Paint model shared between the outline resource and its callers.

pub mod color;

pub use color::Color;
