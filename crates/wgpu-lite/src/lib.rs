//! Thin render/compute sessions over wgpu.
//!
//! A [`Session`] is created once per usage, either for rasterizing triangle
//! lists into a window surface or for running a single compute entry point and
//! reading its output back. Pipeline layouts are fixed:
//! - raster: one vertex buffer of [`Vertex`] records (XYZW + RGBA), one color
//!   target, optional read-only auxiliary buffer at group 0;
//! - compute: optional auxiliary buffer at group 0, then a group holding the
//!   output length and the output array.
//!
//! The [`binding`] and [`geometry`] helpers are usable on their own.

pub mod binding;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod session;

mod color;

pub use color::ColorRgba;
pub use device::{DeviceLimits, EntryPoints, GpuDevice, InitError, SessionConfig, SurfaceErrorAction};
pub use geometry::{quad_to_triangles, quad_vertices, Vertex};
pub use session::{PipelineMode, Session, SessionDesc, SubmitError};
