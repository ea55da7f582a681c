/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};

use crate::error::LoadError;

/// A 3D vertex with position and an optional normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    /// Per-vertex normal; flat shading derives face normals instead.
    pub normal: Option<Vector3<f32>>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: None,
        }
    }

    pub fn with_normal(mut self, nx: f32, ny: f32, nz: f32) -> Self {
        self.normal = Some(Vector3::new(nx, ny, nz));
        self
    }
}

/// A triangle face given by three zero-based indices into a mesh's vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { indices: [a, b, c] }
    }
}

/// A 3D mesh: vertices plus triangles indexing into them
///
/// Every triangle's indices are distinct and in bounds; [`Mesh::new`] is the
/// only way to build one and rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Result<Self, LoadError> {
        for (i, triangle) in triangles.iter().enumerate() {
            let [a, b, c] = triangle.indices;
            for index in [a, b, c] {
                if index >= vertices.len() {
                    return Err(LoadError::IndexOutOfRange {
                        triangle: i + 1,
                        index: index + 1,
                        vertex_count: vertices.len(),
                    });
                }
            }
            if a == b || a == c {
                return Err(LoadError::RepeatedIndex {
                    triangle: i + 1,
                    index: a + 1,
                });
            }
            if b == c {
                return Err(LoadError::RepeatedIndex {
                    triangle: i + 1,
                    index: b + 1,
                });
            }
        }

        Ok(Self {
            vertices,
            triangles,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// World-space positions of a triangle's corners, in index order
    pub fn corners(&self, triangle: &Triangle) -> [Point3<f32>; 3] {
        triangle.indices.map(|i| self.vertices[i].position)
    }

    /// Create a cube mesh centered on the origin with outward-facing winding
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let vertices = vec![
            Vertex::new(-half, -half, -half),
            Vertex::new(half, -half, -half),
            Vertex::new(half, half, -half),
            Vertex::new(-half, half, -half),
            Vertex::new(-half, -half, half),
            Vertex::new(half, -half, half),
            Vertex::new(half, half, half),
            Vertex::new(-half, half, half),
        ];

        let triangles = vec![
            // Front (+z)
            Triangle::new(4, 5, 6),
            Triangle::new(4, 6, 7),
            // Back (-z)
            Triangle::new(0, 3, 2),
            Triangle::new(0, 2, 1),
            // Top (+y)
            Triangle::new(3, 7, 6),
            Triangle::new(3, 6, 2),
            // Bottom (-y)
            Triangle::new(0, 1, 5),
            Triangle::new(0, 5, 4),
            // Right (+x)
            Triangle::new(1, 2, 6),
            Triangle::new(1, 6, 5),
            // Left (-x)
            Triangle::new(0, 4, 7),
            Triangle::new(0, 7, 3),
        ];

        Self {
            vertices,
            triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_index() {
        let vertices = vec![Vertex::new(0.0, 0.0, 0.0), Vertex::new(1.0, 0.0, 0.0)];
        let err = Mesh::new(vertices, vec![Triangle::new(0, 1, 2)]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange {
                triangle: 1,
                index: 3,
                vertex_count: 2
            }
        ));
    }

    #[test]
    fn test_rejects_repeated_index() {
        let vertices = vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ];
        let err = Mesh::new(vertices, vec![Triangle::new(2, 1, 2)]).unwrap_err();
        assert!(matches!(err, LoadError::RepeatedIndex { triangle: 1, .. }));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles().len(), 12);

        for triangle in cube.triangles() {
            let [a, b, c] = cube.corners(triangle);
            let normal = (b - a).cross(&(c - a));
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "inward face {:?}", triangle);
        }
    }
}
