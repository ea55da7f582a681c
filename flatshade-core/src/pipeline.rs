/// Per-frame transform and shading pass over a mesh
use nalgebra::{Point2, Vector3};

use crate::error::DegenerateGeometryError;
use crate::geometry::Mesh;
use crate::projection::{Projector, Viewport};
use crate::shading::{shade_triangle, Color, Light};

/// A projected, shaded triangle ready for rasterization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedTriangle {
    /// Position of the triangle in the mesh
    pub index: usize,
    /// Screen-space corners in pixel coordinates
    pub points: [Point2<f32>; 3],
    pub color: Color,
}

/// Receives triangles in mesh order; later triangles cover earlier ones
pub trait Rasterizer {
    /// Called once before the first triangle of every frame
    fn begin_frame(&mut self) {}

    fn draw_triangle(&mut self, triangle: &RenderedTriangle);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub skipped: usize,
}

/// The inputs of one frame, fixed for every triangle in it
pub struct FramePass<'a> {
    projector: &'a Projector,
    light: &'a Light,
    viewport: Viewport,
    view_dir: Vector3<f32>,
}

impl<'a> FramePass<'a> {
    pub fn new(projector: &'a Projector, light: &'a Light, viewport: Viewport) -> Self {
        Self {
            projector,
            light,
            viewport,
            view_dir: projector.view_direction(),
        }
    }

    /// Project and shade the triangle at `index`
    ///
    /// Panics if `index` is not a triangle of `mesh`.
    pub fn render_triangle(
        &self,
        mesh: &Mesh,
        index: usize,
    ) -> Result<RenderedTriangle, DegenerateGeometryError> {
        let corners = mesh.corners(&mesh.triangles()[index]);

        let mut points = [Point2::origin(); 3];
        for (point, corner) in points.iter_mut().zip(&corners) {
            *point = self.projector.project(corner, self.viewport)?;
        }
        let color = shade_triangle(&corners, &self.view_dir, self.light)?;

        Ok(RenderedTriangle {
            index,
            points,
            color,
        })
    }

    /// Render every triangle in declaration order, reporting the ones skipped
    pub fn run<R, F>(&self, mesh: &Mesh, rasterizer: &mut R, mut on_skip: F) -> FrameStats
    where
        R: Rasterizer + ?Sized,
        F: FnMut(usize, DegenerateGeometryError),
    {
        let mut stats = FrameStats::default();
        rasterizer.begin_frame();

        for index in 0..mesh.triangles().len() {
            match self.render_triangle(mesh, index) {
                Ok(triangle) => {
                    rasterizer.draw_triangle(&triangle);
                    stats.drawn += 1;
                }
                Err(err) => {
                    on_skip(index, err);
                    stats.skipped += 1;
                }
            }
        }

        stats
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::{Triangle, Vertex};
    use crate::projection::{Camera, ProjectionMode};

    /// Records what a frame submits
    #[derive(Default)]
    pub(crate) struct RecordingRasterizer {
        pub frames: usize,
        pub triangles: Vec<RenderedTriangle>,
    }

    impl Rasterizer for RecordingRasterizer {
        fn begin_frame(&mut self) {
            self.frames += 1;
            self.triangles.clear();
        }

        fn draw_triangle(&mut self, triangle: &RenderedTriangle) {
            self.triangles.push(*triangle);
        }
    }

    fn mesh_with_degenerate_middle() -> Mesh {
        let vertices = vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
        ];
        let triangles = vec![
            Triangle::new(0, 1, 2),
            // vertices 1 and 3 share a position
            Triangle::new(1, 3, 2),
            Triangle::new(0, 2, 1),
        ];
        Mesh::new(vertices, triangles).unwrap()
    }

    #[test]
    fn test_degenerate_triangle_is_skipped_in_order() {
        let mesh = mesh_with_degenerate_middle();
        let projector = Projector::new(Camera::default(), ProjectionMode::Direct).unwrap();
        let light = Light::default();
        let pass = FramePass::new(&projector, &light, Viewport::new(800, 600));

        let mut rasterizer = RecordingRasterizer::default();
        let mut skipped = Vec::new();
        let stats = pass.run(&mesh, &mut rasterizer, |i, err| skipped.push((i, err)));

        assert_eq!(stats, FrameStats { drawn: 2, skipped: 1 });
        assert_eq!(skipped, vec![(1, DegenerateGeometryError::ZeroNormal)]);
        let order: Vec<_> = rasterizer.triangles.iter().map(|t| t.index).collect();
        assert_eq!(order, vec![0, 2]);
    }

    #[test]
    fn test_render_triangle_outputs_points_and_color() {
        let mesh = mesh_with_degenerate_middle();
        let projector = Projector::new(Camera::default(), ProjectionMode::Direct).unwrap();
        let light = Light {
            ambient_coefficient: 0.0,
            specular_coefficient: 0.0,
            diffuse_coefficient: Vector3::new(1.0, 1.0, 1.0),
            intensity: Vector3::new(255.0, 255.0, 255.0),
            // straight out along the face normal of triangle 0 (+z)
            position: nalgebra::Point3::new(0.0, 0.0, 10.0),
            ..Light::default()
        };
        let pass = FramePass::new(&projector, &light, Viewport::new(800, 600));

        let triangle = pass.render_triangle(&mesh, 0).unwrap();
        assert_eq!(triangle.color, Color::WHITE);
        assert!((triangle.points[0] - Point2::new(400.0, 300.0)).norm() < 1e-3);

        // reversed winding faces away from the light
        let back = pass.render_triangle(&mesh, 2).unwrap();
        assert_eq!(back.color, Color::new(0, 0, 0));
    }
}
