/// `key = value` camera and light sources
///
/// Fields appear one per line in a fixed order; keys are matched without
/// regard to case. The `Display` impls write the same layout back out.
use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::error::LoadError;
use crate::parse::{ensure_finite, parse_field, parse_line, SourceLines};
use crate::projection::Camera;
use crate::shading::Light;

struct FieldReader<'a> {
    lines: SourceLines<'a>,
}

impl<'a> FieldReader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: SourceLines::new(input),
        }
    }

    fn values(&mut self, key: &'static str, count: usize) -> Result<Vec<f32>, LoadError> {
        let (line_no, line) = self.lines.next_line(&format!("field `{}`", key))?;
        let (found, values) = parse_line(line_no, line, "`key = value`", parse_field)?;

        if !found.eq_ignore_ascii_case(key) {
            return Err(LoadError::UnexpectedField {
                line: line_no,
                expected: key,
                found: found.to_string(),
            });
        }
        if values.len() != count {
            return Err(LoadError::FieldArity {
                line: line_no,
                field: key,
                expected: count,
                found: values.len(),
            });
        }
        ensure_finite(line_no, &values)?;

        Ok(values)
    }

    fn scalar(&mut self, key: &'static str) -> Result<f32, LoadError> {
        Ok(self.values(key, 1)?[0])
    }

    fn vector(&mut self, key: &'static str) -> Result<Vector3<f32>, LoadError> {
        let v = self.values(key, 3)?;
        Ok(Vector3::new(v[0], v[1], v[2]))
    }

    fn point(&mut self, key: &'static str) -> Result<Point3<f32>, LoadError> {
        self.vector(key).map(Point3::from)
    }
}

/// Parse `N`, `V`, `d`, `hx`, `hy`, `C` in that order
pub fn parse_camera(input: &str) -> Result<Camera, LoadError> {
    let mut fields = FieldReader::new(input);

    let up = fields.vector("N")?;
    let view = fields.vector("V")?;
    let distance = fields.scalar("d")?;
    let hx = fields.scalar("hx")?;
    let hy = fields.scalar("hy")?;
    let position = fields.point("C")?;

    Ok(Camera {
        position,
        up,
        view,
        distance,
        hx,
        hy,
    })
}

/// Parse `Iamb`, `Ka`, `Il`, `Pl`, `Kd`, `Od`, `Ks`, `eta` in that order
pub fn parse_light(input: &str) -> Result<Light, LoadError> {
    let mut fields = FieldReader::new(input);

    Ok(Light {
        ambient_intensity: fields.vector("Iamb")?,
        ambient_coefficient: fields.scalar("Ka")?,
        intensity: fields.vector("Il")?,
        position: fields.point("Pl")?,
        diffuse_coefficient: fields.vector("Kd")?,
        diffuse_reflectance: fields.vector("Od")?,
        specular_coefficient: fields.scalar("Ks")?,
        shininess: fields.scalar("eta")?,
    })
}

fn write_vector(f: &mut fmt::Formatter<'_>, key: &str, v: &Vector3<f32>) -> fmt::Result {
    writeln!(f, "{} = {} {} {}", key, v.x, v.y, v.z)
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_vector(f, "N", &self.up)?;
        write_vector(f, "V", &self.view)?;
        writeln!(f, "d = {}", self.distance)?;
        writeln!(f, "hx = {}", self.hx)?;
        writeln!(f, "hy = {}", self.hy)?;
        write_vector(f, "C", &self.position.coords)
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_vector(f, "Iamb", &self.ambient_intensity)?;
        writeln!(f, "Ka = {}", self.ambient_coefficient)?;
        write_vector(f, "Il", &self.intensity)?;
        write_vector(f, "Pl", &self.position.coords)?;
        write_vector(f, "Kd", &self.diffuse_coefficient)?;
        write_vector(f, "Od", &self.diffuse_reflectance)?;
        writeln!(f, "Ks = {}", self.specular_coefficient)?;
        writeln!(f, "eta = {}", self.shininess)
    }
}
