/// flatshade core library - geometry, projection and flat Phong shading
///
/// This library holds everything between the text sources and the
/// rasterizer: mesh/camera/light parsing, view-space transforms, perspective
/// projection, face normals and the Phong color of each triangle, plus the
/// frame driver that runs them once per frame.

pub mod byu;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod params;
mod parse;
pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use driver::{Command, DriverState, FrameDriver, ReloadTarget, RenderSettings};
pub use error::{ConfigurationError, DegenerateGeometryError, Error, LoadError, Result, SourceKind};
pub use geometry::{Mesh, Triangle, Vertex};
pub use pipeline::{FramePass, FrameStats, Rasterizer, RenderedTriangle};
pub use projection::{Camera, ProjectionMode, Projector, Viewport};
pub use scene::{Scene, SceneSources};
pub use shading::{Color, Light};
pub use transform::{Transform, ViewBasis};
