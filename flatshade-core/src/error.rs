/// Error taxonomy for loading, configuring and rendering a scene
use std::fmt;
use std::path::PathBuf;

use nalgebra::Vector3;
use thiserror::Error;

/// A malformed or unreadable mesh, camera or light source
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: expected field `{expected}`, found `{found}`")]
    UnexpectedField {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: field `{field}` takes {expected} value(s), found {found}")]
    FieldArity {
        line: usize,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("triangle {triangle}: vertex index {index} is out of range 1..={vertex_count}")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("triangle {triangle}: vertex index {index} is used more than once")]
    RepeatedIndex { triangle: usize, index: usize },
}

/// Geometry that cannot be normalized or projected; affects a single triangle
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DegenerateGeometryError {
    #[error("face normal has zero length (collinear or repeated vertices)")]
    ZeroNormal,

    #[error("light position coincides with the first vertex")]
    ZeroLightDirection,

    #[error("projection divisor {depth} is zero (vertex on the camera plane)")]
    ZeroDepth { depth: f32 },
}

/// Camera parameters that do not define a usable view
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigurationError {
    #[error("view direction V has zero length")]
    ZeroViewDirection,

    #[error("up hint N {up:?} is parallel to view direction V {view:?}")]
    ParallelBasis {
        up: Vector3<f32>,
        view: Vector3<f32>,
    },

    #[error("scale factor `{field}` must be non-zero")]
    ZeroScale { field: &'static str },
}

/// Which external source a load error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Mesh,
    Camera,
    Light,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Mesh => "mesh",
            SourceKind::Camera => "camera",
            SourceKind::Light => "light",
        };
        f.write_str(name)
    }
}

/// Top-level error for loading and reloading a scene
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load {kind} from {}: {source}", .path.display())]
    Load {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("invalid camera configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, Error>;
