//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - allocating offscreen color/depth targets
//! - providing encoders and submitting recorded work

mod gpu;
mod init;
mod target;

pub use gpu::Gpu;
pub use init::GpuInit;
pub use target::{OffscreenDesc, OffscreenTarget};
