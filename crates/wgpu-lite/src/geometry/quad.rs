use std::fmt;

use super::{Vertex, FLOATS_PER_VERTEX};

/// Corner order of the two triangles covering a quad.
pub const QUAD_SPLIT: [usize; 6] = [0, 2, 3, 0, 1, 3];

/// The input to [`quad_to_triangles`] did not hold four vertex records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadError {
    pub floats: usize,
}

impl fmt::Display for QuadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a quad needs {} floats (4 vertices), got {}",
            4 * FLOATS_PER_VERTEX,
            self.floats
        )
    }
}

impl std::error::Error for QuadError {}

/// Splits a quad given as four flat vertex records into six records (two
/// triangles: corners 0,2,3 then 0,1,3).
///
/// Floats past the fourth record are ignored.
pub fn quad_to_triangles(vertices: &[f32]) -> Result<Vec<f32>, QuadError> {
    if vertices.len() < 4 * FLOATS_PER_VERTEX {
        return Err(QuadError {
            floats: vertices.len(),
        });
    }

    let corners: Vec<&[f32]> = vertices.chunks_exact(FLOATS_PER_VERTEX).take(4).collect();
    Ok(QUAD_SPLIT
        .iter()
        .flat_map(|&i| corners[i].iter().copied())
        .collect())
}

/// Typed counterpart of [`quad_to_triangles`].
pub fn quad_vertices(corners: &[Vertex; 4]) -> [Vertex; 6] {
    QUAD_SPLIT.map(|i| corners[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(i: usize) -> Vec<f32> {
        (0..FLOATS_PER_VERTEX).map(|k| (i * 10 + k) as f32).collect()
    }

    fn quad() -> Vec<f32> {
        (0..4).flat_map(corner).collect()
    }

    #[test]
    fn emits_six_records() {
        let out = quad_to_triangles(&quad()).unwrap();
        assert_eq!(out.len(), 6 * FLOATS_PER_VERTEX);
    }

    #[test]
    fn first_triangle_is_0_2_3() {
        let out = quad_to_triangles(&quad()).unwrap();
        let records: Vec<&[f32]> = out.chunks(FLOATS_PER_VERTEX).collect();
        assert_eq!(records[0], corner(0).as_slice());
        assert_eq!(records[1], corner(2).as_slice());
        assert_eq!(records[2], corner(3).as_slice());
    }

    #[test]
    fn second_triangle_is_0_1_3() {
        let out = quad_to_triangles(&quad()).unwrap();
        let records: Vec<&[f32]> = out.chunks(FLOATS_PER_VERTEX).collect();
        assert_eq!(records[3], corner(0).as_slice());
        assert_eq!(records[4], corner(1).as_slice());
        assert_eq!(records[5], corner(3).as_slice());
    }

    #[test]
    fn short_input_rejected() {
        let err = quad_to_triangles(&[0.0; 31]).unwrap_err();
        assert_eq!(err.floats, 31);
        assert!(err.to_string().contains("32 floats"));
    }

    #[test]
    fn trailing_floats_ignored() {
        let mut input = quad();
        input.extend(corner(4));
        assert_eq!(quad_to_triangles(&input).unwrap(), quad_to_triangles(&quad()).unwrap());
    }

    #[test]
    fn typed_split_matches_flat_split() {
        let corners: [Vertex; 4] = std::array::from_fn(|i| {
            let c = corner(i);
            Vertex::new([c[0], c[1], c[2], c[3]], [c[4], c[5], c[6], c[7]])
        });
        let typed = quad_vertices(&corners);
        let flat: &[f32] = bytemuck::cast_slice(&typed);
        assert_eq!(flat, quad_to_triangles(&quad()).unwrap().as_slice());
    }
}
