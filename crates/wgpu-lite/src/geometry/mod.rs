//! CPU-side vertex data.
//!
//! A vertex record is eight floats: XYZW position followed by RGBA color.

mod quad;
mod vertex;

pub use quad::{quad_to_triangles, quad_vertices, QuadError, QUAD_SPLIT};
pub use vertex::{Vertex, FLOATS_PER_VERTEX};
