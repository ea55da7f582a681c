/// Flat Phong shading
use nalgebra::{Point3, Vector3};

use crate::error::DegenerateGeometryError;
use crate::transform::GEOMETRY_EPSILON;

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Clamp each channel to [0, 255] and truncate toward zero; NaN becomes 0
    pub fn from_channels(channels: &Vector3<f32>) -> Self {
        let quantize = |c: f32| {
            if c.is_nan() {
                0
            } else {
                c.clamp(0.0, 255.0) as u8
            }
        };
        Self::new(quantize(channels.x), quantize(channels.y), quantize(channels.z))
    }
}

/// Point light and surface reflectance parameters, as read from a light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Ambient intensity Iamb, per channel
    pub ambient_intensity: Vector3<f32>,
    /// Ambient coefficient Ka
    pub ambient_coefficient: f32,
    /// Light intensity Il, per channel
    pub intensity: Vector3<f32>,
    /// Light position Pl
    pub position: Point3<f32>,
    /// Diffuse coefficient Kd, per channel
    pub diffuse_coefficient: Vector3<f32>,
    /// Diffuse reflectance Od. Loaded and written back, not used by the diffuse term.
    pub diffuse_reflectance: Vector3<f32>,
    /// Specular coefficient Ks
    pub specular_coefficient: f32,
    /// Shininess exponent eta
    pub shininess: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient_intensity: Vector3::new(100.0, 100.0, 100.0),
            ambient_coefficient: 0.2,
            intensity: Vector3::new(127.0, 213.0, 254.0),
            position: Point3::new(60.0, 5.0, -10.0),
            diffuse_coefficient: Vector3::new(0.5, 0.3, 0.2),
            diffuse_reflectance: Vector3::new(0.7, 0.5, 0.8),
            specular_coefficient: 0.5,
            shininess: 1.0,
        }
    }
}

/// Unit normal of the plane through `v1, v2, v3`, oriented by winding order
pub fn face_normal(
    v1: &Point3<f32>,
    v2: &Point3<f32>,
    v3: &Point3<f32>,
) -> Result<Vector3<f32>, DegenerateGeometryError> {
    (v2 - v1)
        .cross(&(v3 - v1))
        .try_normalize(GEOMETRY_EPSILON)
        .ok_or(DegenerateGeometryError::ZeroNormal)
}

/// Direction from `point` toward the light
pub fn light_direction(
    light: &Light,
    point: &Point3<f32>,
) -> Result<Vector3<f32>, DegenerateGeometryError> {
    (light.position - point)
        .try_normalize(GEOMETRY_EPSILON)
        .ok_or(DegenerateGeometryError::ZeroLightDirection)
}

/// Evaluate ambient + diffuse + specular for one face
///
/// All vectors are expected to be unit length. Products between light and
/// surface terms are per channel.
pub fn phong_illumination(
    normal: &Vector3<f32>,
    light_dir: &Vector3<f32>,
    view_dir: &Vector3<f32>,
    light: &Light,
) -> Color {
    let ambient = light.ambient_intensity * light.ambient_coefficient;

    let n_dot_l = normal.dot(light_dir);
    let diffuse = light
        .diffuse_coefficient
        .component_mul(&light.intensity)
        * n_dot_l.max(0.0);

    let reflect = normal * (2.0 * n_dot_l) - light_dir;
    let highlight = reflect.dot(view_dir).max(0.0).powf(light.shininess);
    let specular = light.intensity * (light.specular_coefficient * highlight);

    Color::from_channels(&(ambient + diffuse + specular))
}

/// Flat-shade a triangle from its world-space corners
///
/// The light direction is taken at the first corner and stands in for the
/// whole face.
pub fn shade_triangle(
    corners: &[Point3<f32>; 3],
    view_dir: &Vector3<f32>,
    light: &Light,
) -> Result<Color, DegenerateGeometryError> {
    let [v1, v2, v3] = corners;
    let normal = face_normal(v1, v2, v3)?;
    let light_dir = light_direction(light, v1)?;
    Ok(phong_illumination(&normal, &light_dir, view_dir, light))
}
