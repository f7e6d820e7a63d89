//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the optional Surface (swapchain)
//! - classifying surface acquisition failures

mod error;
mod gpu;
mod init;
mod surface;

pub use error::{InitError, SurfaceErrorAction};
pub use gpu::GpuDevice;
pub use init::{DeviceLimits, EntryPoints, SessionConfig};
