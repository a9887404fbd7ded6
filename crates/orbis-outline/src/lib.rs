//! Orbis outline crate.
//!
//! Screen-constant-width outlines (and optional stipple dashes) for surface
//! shapes drawn on a globe. The extrusion runs in an embedded WGSL vertex
//! kernel; this crate owns the compiled program and its typed uniform surface.

pub mod backend;
pub mod device;
pub mod logging;
pub mod outline;
pub mod paint;
pub mod program;
pub mod render;
