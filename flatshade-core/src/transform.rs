/// Camera frame construction and world-to-view transformations
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::ConfigurationError;

/// Below this length a vector is treated as zero
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// Orthonormal camera axes expressed in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    pub x: Vector3<f32>,
    pub y: Vector3<f32>,
    pub z: Vector3<f32>,
}

impl ViewBasis {
    /// Build the basis from an up hint `up` (N) and a look direction `view` (V)
    ///
    /// `Z = normalize(V)`, `X = normalize(N x Z)`, `Y = Z x X`.
    pub fn new(up: &Vector3<f32>, view: &Vector3<f32>) -> Result<Self, ConfigurationError> {
        let z = view
            .try_normalize(GEOMETRY_EPSILON)
            .ok_or(ConfigurationError::ZeroViewDirection)?;
        let x = up
            .cross(&z)
            .try_normalize(GEOMETRY_EPSILON)
            .ok_or(ConfigurationError::ParallelBasis {
                up: *up,
                view: *view,
            })?;
        let y = z.cross(&x);

        Ok(Self { x, y, z })
    }
}

/// Transform builder for camera-space mappings
pub struct Transform;

impl Transform {
    /// Rows are the basis axes; the translation column sends `eye` to the origin
    #[rustfmt::skip]
    pub fn view_matrix(basis: &ViewBasis, eye: &Point3<f32>) -> Matrix4<f32> {
        let c = eye.coords;
        let (x, y, z) = (basis.x, basis.y, basis.z);

        Matrix4::new(
            x.x, x.y, x.z, -x.dot(&c),
            y.x, y.y, y.z, -y.dot(&c),
            z.x, z.y, z.z, -z.dot(&c),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Offset of `point` from the eye, without rotating into the camera basis
    pub fn world_to_view(point: &Point3<f32>, eye: &Point3<f32>) -> Vector3<f32> {
        point - eye
    }

    /// Apply a view matrix to the homogeneous point `(x, y, z, 1)`
    pub fn to_view_space(view_matrix: &Matrix4<f32>, point: &Point3<f32>) -> Vector3<f32> {
        (view_matrix * point.to_homogeneous()).xyz()
    }
}
