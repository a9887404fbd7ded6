//! Draw-time plumbing shared by the backend and its callers.
//!
//! Convention:
//! - geometry is in body-centered world coordinates; the outline kernel
//!   projects it with the model-view-projection uniform
//! - passes load existing color/depth contents; clearing is the caller's job

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
