/// Scene values and the files they are loaded from
use std::fs;
use std::path::{Path, PathBuf};

use crate::byu::parse_byu;
use crate::error::{Error, LoadError, Result, SourceKind};
use crate::geometry::Mesh;
use crate::params::{parse_camera, parse_light};
use crate::projection::Camera;
use crate::shading::Light;

/// Edge length of the cube used when no mesh source is given
pub const DEFAULT_CUBE_SIZE: f32 = 2.0;

/// Where each scene value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSources {
    /// `None` selects the built-in cube
    pub mesh: Option<PathBuf>,
    pub camera: PathBuf,
    pub light: PathBuf,
}

/// Everything a frame needs, owned by the driver
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub mesh: Mesh,
    pub camera: Camera,
    pub light: Light,
}

fn load_source<T>(
    kind: SourceKind,
    path: &Path,
    parse: impl FnOnce(&str) -> std::result::Result<T, LoadError>,
) -> Result<T> {
    let wrap = |source: LoadError| Error::Load {
        kind,
        path: path.to_path_buf(),
        source,
    };
    let text = fs::read_to_string(path).map_err(|e| wrap(LoadError::Io(e)))?;
    parse(&text).map_err(wrap)
}

pub fn load_mesh(path: &Path) -> Result<Mesh> {
    load_source(SourceKind::Mesh, path, parse_byu)
}

pub fn load_camera(path: &Path) -> Result<Camera> {
    load_source(SourceKind::Camera, path, parse_camera)
}

pub fn load_light(path: &Path) -> Result<Light> {
    load_source(SourceKind::Light, path, parse_light)
}

impl Scene {
    pub fn load(sources: &SceneSources) -> Result<Self> {
        let mesh = match &sources.mesh {
            Some(path) => load_mesh(path)?,
            None => Mesh::cube(DEFAULT_CUBE_SIZE),
        };
        let camera = load_camera(&sources.camera)?;
        let light = load_light(&sources.light)?;

        Ok(Self {
            mesh,
            camera,
            light,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_names_kind_and_path() {
        let path = std::env::temp_dir().join("flatshade-does-not-exist.txt");
        let err = load_light(&path).unwrap_err();
        match err {
            Error::Load {
                kind,
                path: failed,
                source: LoadError::Io(_),
            } => {
                assert_eq!(kind, SourceKind::Light);
                assert_eq!(failed, path);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sample_scene_loads() {
        let scenes = Path::new(env!("CARGO_MANIFEST_DIR")).join("../scenes");
        let scene = Scene::load(&SceneSources {
            mesh: Some(scenes.join("cube.byu")),
            camera: scenes.join("camera.txt"),
            light: scenes.join("light.txt"),
        })
        .unwrap();

        assert_eq!(scene.mesh.vertices().len(), 8);
        assert_eq!(scene.mesh.triangles().len(), 12);
        assert_eq!(scene.light.shininess, 2.0);
        assert!(scene.camera.basis().is_ok());
    }
}
