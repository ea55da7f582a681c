/// Frame driver: owns the scene, applies reloads between frames, runs the pass
use std::collections::HashSet;

use log::{debug, info, warn};

use crate::error::{DegenerateGeometryError, Result};
use crate::geometry::Mesh;
use crate::pipeline::{FramePass, FrameStats, Rasterizer};
use crate::projection::{Camera, ProjectionMode, Projector, Viewport};
use crate::scene::{load_camera, load_light, Scene, SceneSources};
use crate::shading::Light;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Loading,
    Running,
    Failed,
    Terminated,
}

/// Which scene values a reload re-reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadTarget {
    Camera,
    Light,
    /// Camera and light together; neither is replaced unless both load
    All,
}

/// Input the front end forwards between frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reload(ReloadTarget),
    Quit,
}

/// Session configuration, fixed for the lifetime of the driver except for
/// the viewport, which follows the surface size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub mode: ProjectionMode,
    pub viewport: Viewport,
}

struct ActiveScene {
    mesh: Mesh,
    projector: Projector,
    light: Light,
}

pub struct FrameDriver {
    sources: SceneSources,
    settings: RenderSettings,
    state: DriverState,
    scene: Option<ActiveScene>,
    /// Triangles already warned about since the last scene change
    reported: HashSet<usize>,
}

impl FrameDriver {
    pub fn new(sources: SceneSources, settings: RenderSettings) -> Self {
        Self {
            sources,
            settings,
            state: DriverState::Loading,
            scene: None,
            reported: HashSet::new(),
        }
    }

    /// Read every source and enter `Running`, or `Failed` on any error
    pub fn load(&mut self) -> Result<()> {
        if self.state != DriverState::Loading {
            warn!("load requested in state {:?}; ignoring", self.state);
            return Ok(());
        }

        match self.load_scene() {
            Ok(scene) => {
                info!(
                    "scene loaded: {} vertices, {} triangles, {:?} projection",
                    scene.mesh.vertices().len(),
                    scene.mesh.triangles().len(),
                    self.settings.mode
                );
                self.scene = Some(scene);
                self.state = DriverState::Running;
                Ok(())
            }
            Err(err) => {
                self.state = DriverState::Failed;
                Err(err)
            }
        }
    }

    fn load_scene(&self) -> Result<ActiveScene> {
        match &self.sources.mesh {
            Some(path) => info!("loading mesh from {}", path.display()),
            None => info!("no mesh source given; using built-in cube"),
        }
        let Scene {
            mesh,
            camera,
            light,
        } = Scene::load(&self.sources)?;
        let projector = Projector::new(camera, self.settings.mode)?;

        Ok(ActiveScene {
            mesh,
            projector,
            light,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn sources(&self) -> &SceneSources {
        &self.sources
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.settings.viewport = viewport;
        self.reported.clear();
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.scene.as_ref().map(|s| &s.mesh)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.scene.as_ref().map(|s| s.projector.camera())
    }

    pub fn light(&self) -> Option<&Light> {
        self.scene.as_ref().map(|s| &s.light)
    }

    /// Apply one command; a failed reload leaves the active scene untouched
    pub fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Quit => {
                self.terminate();
                Ok(())
            }
            Command::Reload(target) => self.reload(target),
        }
    }

    pub fn terminate(&mut self) {
        if self.state != DriverState::Terminated {
            info!("terminating frame driver");
        }
        self.state = DriverState::Terminated;
    }

    pub fn reload(&mut self, target: ReloadTarget) -> Result<()> {
        if self.state != DriverState::Running {
            warn!("reload requested in state {:?}; ignoring", self.state);
            return Ok(());
        }

        let (projector, light) = match self.read_replacements(target) {
            Ok(replacements) => replacements,
            Err(err) => {
                warn!("reload of {:?} rejected, keeping previous values: {}", target, err);
                return Err(err);
            }
        };

        if let Some(scene) = self.scene.as_mut() {
            if let Some(projector) = projector {
                scene.projector = projector;
                info!("camera reloaded from {}", self.sources.camera.display());
            }
            if let Some(light) = light {
                scene.light = light;
                info!("light reloaded from {}", self.sources.light.display());
            }
        }
        self.reported.clear();
        Ok(())
    }

    /// Fully parse and validate the values `target` names without touching the scene
    fn read_replacements(
        &self,
        target: ReloadTarget,
    ) -> Result<(Option<Projector>, Option<Light>)> {
        let projector = match target {
            ReloadTarget::Camera | ReloadTarget::All => {
                let camera = load_camera(&self.sources.camera)?;
                Some(Projector::new(camera, self.settings.mode)?)
            }
            ReloadTarget::Light => None,
        };
        let light = match target {
            ReloadTarget::Light | ReloadTarget::All => Some(load_light(&self.sources.light)?),
            ReloadTarget::Camera => None,
        };
        Ok((projector, light))
    }

    /// Render one frame; `None` unless the driver is running
    pub fn step_frame<R: Rasterizer + ?Sized>(&mut self, rasterizer: &mut R) -> Option<FrameStats> {
        if self.state != DriverState::Running {
            return None;
        }
        let scene = self.scene.as_ref()?;
        let reported = &mut self.reported;

        let pass = FramePass::new(&scene.projector, &scene.light, self.settings.viewport);
        let stats = pass.run(&scene.mesh, rasterizer, |index, err: DegenerateGeometryError| {
            if reported.insert(index) {
                warn!("skipping triangle {}: {}", index + 1, err);
            } else {
                debug!("skipping triangle {}: {}", index + 1, err);
            }
        });

        debug!("frame: {} drawn, {} skipped", stats.drawn, stats.skipped);
        Some(stats)
    }
}
