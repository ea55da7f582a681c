/// Camera and projection utilities
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::error::{ConfigurationError, DegenerateGeometryError};
use crate::transform::{Transform, ViewBasis, GEOMETRY_EPSILON};

/// How world points reach the screen
///
/// Both modes produce coordinates for a surface whose origin is the top-left
/// corner with y growing downward. `Direct` flips y, so world +y appears up;
/// `ViewMatrix` does not, so the camera's +Y axis appears down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Offset from the eye point only, scaled by `width / (2 hx)`
    #[default]
    Direct,
    /// Full view matrix, perspective divide by `z + d`, scaled by `hx`
    ViewMatrix,
}

/// Pixel dimensions of the target surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Pinhole camera parameters, as read from a camera source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye point C
    pub position: Point3<f32>,
    /// Up hint N
    pub up: Vector3<f32>,
    /// Look direction V
    pub view: Vector3<f32>,
    /// Projection distance d
    pub distance: f32,
    pub hx: f32,
    pub hy: f32,
}

impl Camera {
    pub fn basis(&self) -> Result<ViewBasis, ConfigurationError> {
        ViewBasis::new(&self.up, &self.view)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, -5.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            view: Vector3::new(0.0, 0.0, 1.0),
            distance: 5.0,
            hx: 2.0,
            hy: 2.0,
        }
    }
}

fn checked_divisor(depth: f32) -> Result<f32, DegenerateGeometryError> {
    if depth.abs() < GEOMETRY_EPSILON || !depth.is_finite() {
        return Err(DegenerateGeometryError::ZeroDepth { depth });
    }
    Ok(depth)
}

/// Project a point already offset from the eye (see [`Transform::world_to_view`])
pub fn project_direct(
    view: &Vector3<f32>,
    camera: &Camera,
    viewport: Viewport,
) -> Result<Point2<f32>, DegenerateGeometryError> {
    let z = checked_divisor(view.z)?;
    let (width, height) = (viewport.width, viewport.height);

    let x = (view.x * camera.distance / z) * (width / (2.0 * camera.hx)) + width / 2.0;
    let y = (view.y * camera.distance / z) * (height / (2.0 * camera.hy)) + height / 2.0;

    Ok(Point2::new(x, height - y))
}

/// Project a point already in camera space (see [`Transform::to_view_space`])
pub fn project_perspective(
    transformed: &Vector3<f32>,
    camera: &Camera,
    viewport: Viewport,
) -> Result<Point2<f32>, DegenerateGeometryError> {
    let z = checked_divisor(transformed.z + camera.distance)?;

    let x = (transformed.x * camera.distance / z) * camera.hx + viewport.width / 2.0;
    let y = (transformed.y * camera.distance / z) * camera.hy + viewport.height / 2.0;

    Ok(Point2::new(x, y))
}

/// A validated camera together with its derived view frame
///
/// Built once per camera value and reused for every frame until the camera
/// is replaced.
#[derive(Debug, Clone)]
pub struct Projector {
    camera: Camera,
    basis: ViewBasis,
    view_matrix: Matrix4<f32>,
    view_direction: Vector3<f32>,
    mode: ProjectionMode,
}

impl Projector {
    pub fn new(camera: Camera, mode: ProjectionMode) -> Result<Self, ConfigurationError> {
        if camera.hx.abs() < GEOMETRY_EPSILON {
            return Err(ConfigurationError::ZeroScale { field: "hx" });
        }
        if camera.hy.abs() < GEOMETRY_EPSILON {
            return Err(ConfigurationError::ZeroScale { field: "hy" });
        }

        let basis = camera.basis()?;
        let view_matrix = Transform::view_matrix(&basis, &camera.position);
        // An eye at the origin has no direction of its own; use the look axis.
        let view_direction = (-camera.position.coords)
            .try_normalize(GEOMETRY_EPSILON)
            .unwrap_or(basis.z);

        Ok(Self {
            camera,
            basis,
            view_matrix,
            view_direction,
            mode,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn basis(&self) -> &ViewBasis {
        &self.basis
    }

    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view_matrix
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Fixed view direction for specular shading: `-normalize(C)`
    pub fn view_direction(&self) -> Vector3<f32> {
        self.view_direction
    }

    /// Project a world-space point to screen coordinates
    pub fn project(
        &self,
        point: &Point3<f32>,
        viewport: Viewport,
    ) -> Result<Point2<f32>, DegenerateGeometryError> {
        match self.mode {
            ProjectionMode::Direct => {
                let view = Transform::world_to_view(point, &self.camera.position);
                project_direct(&view, &self.camera, viewport)
            }
            ProjectionMode::ViewMatrix => {
                let transformed = Transform::to_view_space(&self.view_matrix, point);
                project_perspective(&transformed, &self.camera, viewport)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_camera() -> Camera {
        Camera {
            position: Point3::new(0.0, 0.0, -5.0),
            distance: 5.0,
            hx: 2.0,
            hy: 2.0,
            ..Camera::default()
        }
    }

    fn scenario_points() -> [Point3<f32>; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn assert_finite_and_distinct(points: &[Point2<f32>]) {
        for p in points {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert!((points[i] - points[j]).norm() > 1e-3);
            }
        }
    }

    #[test]
    fn test_direct_projection_scenario() {
        let projector = Projector::new(scenario_camera(), ProjectionMode::Direct).unwrap();
        let viewport = Viewport::new(800, 600);
        let points: Vec<_> = scenario_points()
            .iter()
            .map(|p| projector.project(p, viewport).unwrap())
            .collect();

        assert_finite_and_distinct(&points);
        assert!((points[0] - Point2::new(400.0, 300.0)).norm() < 1e-3);
        assert!((points[1] - Point2::new(600.0, 300.0)).norm() < 1e-3);
        // Direct mode flips y: world +y is up on screen
        assert!((points[2] - Point2::new(400.0, 150.0)).norm() < 1e-3);
    }

    #[test]
    fn test_view_matrix_projection_scenario() {
        let projector = Projector::new(scenario_camera(), ProjectionMode::ViewMatrix).unwrap();
        let viewport = Viewport::new(800, 600);
        let points: Vec<_> = scenario_points()
            .iter()
            .map(|p| projector.project(p, viewport).unwrap())
            .collect();

        assert_finite_and_distinct(&points);
        assert!((points[0] - Point2::new(400.0, 300.0)).norm() < 1e-3);
        assert!((points[2] - Point2::new(400.0, 301.0)).norm() < 1e-3);
    }

    #[test]
    fn test_direct_projection_is_translation_invariant() {
        let camera = scenario_camera();
        let offset = Vector3::new(12.5, -3.0, 40.0);
        let moved = Camera {
            position: camera.position + offset,
            ..camera
        };
        let a = Projector::new(camera, ProjectionMode::Direct).unwrap();
        let b = Projector::new(moved, ProjectionMode::Direct).unwrap();
        let viewport = Viewport::new(640, 480);

        for point in [Point3::new(0.3, -0.7, 1.0), Point3::new(-2.0, 1.5, 4.0)] {
            let p = a.project(&point, viewport).unwrap();
            let q = b.project(&(point + offset), viewport).unwrap();
            assert!((p - q).norm() < 1e-2);
        }
    }

    #[test]
    fn test_point_on_camera_plane_is_degenerate() {
        let projector = Projector::new(scenario_camera(), ProjectionMode::Direct).unwrap();
        let err = projector
            .project(&Point3::new(1.0, 1.0, -5.0), Viewport::new(800, 600))
            .unwrap_err();
        assert!(matches!(err, DegenerateGeometryError::ZeroDepth { .. }));

        let projector = Projector::new(scenario_camera(), ProjectionMode::ViewMatrix).unwrap();
        // z' = (z + 5) + d is zero at z = -10
        let err = projector
            .project(&Point3::new(0.0, 0.0, -10.0), Viewport::new(800, 600))
            .unwrap_err();
        assert!(matches!(err, DegenerateGeometryError::ZeroDepth { .. }));
    }

    #[test]
    fn test_zero_scale_is_configuration_error() {
        let camera = Camera {
            hy: 0.0,
            ..Camera::default()
        };
        let err = Projector::new(camera, ProjectionMode::Direct).unwrap_err();
        assert_eq!(err, ConfigurationError::ZeroScale { field: "hy" });
    }

    #[test]
    fn test_view_direction_points_from_eye_toward_origin() {
        let projector = Projector::new(scenario_camera(), ProjectionMode::Direct).unwrap();
        assert!((projector.view_direction() - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);

        let at_origin = Camera {
            position: Point3::origin(),
            ..Camera::default()
        };
        let projector = Projector::new(at_origin, ProjectionMode::Direct).unwrap();
        assert_eq!(projector.view_direction(), projector.basis().z);
    }
}
